//! Pure rendering of a [`MonthlyBilan`] into display lines and table
//! rows. No I/O — the GUI host decides where the text ends up.
//!
//! Display strings stay in French, matching the clinic's user
//! interface; an empty month renders explicit placeholder text instead
//! of dropping sections.

use rust_decimal::Decimal;

use crate::models::MonthlyBilan;

const RULE: &str = "═══════════════════════════════════════════════════";
const LIGHT_RULE: &str = "───────────────────────────────────────────────────";

pub const CATEGORY_COLUMNS: [&str; 2] = ["Catégorie", "Nombre de consultations"];
pub const WEEKLY_COLUMNS: [&str; 2] = ["Semaine", "Nombre de consultations"];

/// Full report, one string per display line.
pub fn render_report(bilan: &MonthlyBilan) -> Vec<String> {
    let mut lines = vec![
        RULE.to_string(),
        format!("        BILAN MENSUEL - {} {}", bilan.month_name(), bilan.year),
        RULE.to_string(),
        String::new(),
        "STATISTIQUES GÉNÉRALES".to_string(),
        LIGHT_RULE.to_string(),
        format!("   Nombre total de consultations : {}", bilan.total_count),
        format!("   Chiffre d'affaires            : {} DH", amount(bilan.revenue)),
        format!(
            "   Prix moyen par consultation   : {} DH",
            amount(bilan.average_price())
        ),
        String::new(),
        "STATISTIQUES DE PAIEMENT".to_string(),
        LIGHT_RULE.to_string(),
        format!("   Consultations payées          : {}", bilan.paid_count),
        format!("   Consultations impayées        : {}", bilan.unpaid_count),
        format!(
            "   Montant des impayés           : {} DH",
            amount(bilan.unpaid_amount)
        ),
        format!("   Taux de paiement              : {}", rate(bilan.payment_rate())),
        String::new(),
        "CONSULTATIONS PAR CATÉGORIE".to_string(),
        LIGHT_RULE.to_string(),
    ];

    if bilan.per_category_counts.is_empty() {
        lines.push("   Aucune donnée".to_string());
    } else {
        for (designation, count) in &bilan.per_category_counts {
            lines.push(format!("   • {designation} : {count}"));
        }
    }

    lines
}

/// One-line summary, e.g. for a dashboard header.
pub fn summary_line(bilan: &MonthlyBilan) -> String {
    format!(
        "{} {} : {} consultations, {} DH ({} payées)",
        bilan.month_name(),
        bilan.year,
        bilan.total_count,
        amount(bilan.revenue),
        rate(bilan.payment_rate()),
    )
}

/// (designation, count) table rows; empty month gives no rows.
pub fn category_rows(bilan: &MonthlyBilan) -> Vec<(String, u32)> {
    bilan
        .per_category_counts
        .iter()
        .map(|(designation, count)| (designation.clone(), *count))
        .collect()
}

/// ("Semaine N", count) table rows — always the five buckets, zeros
/// included.
pub fn weekly_rows(bilan: &MonthlyBilan) -> Vec<(String, u32)> {
    bilan
        .weekly_evolution
        .iter()
        .enumerate()
        .map(|(i, count)| (format!("Semaine {}", i + 1), *count))
        .collect()
}

fn amount(value: Decimal) -> String {
    format!("{value:.2}")
}

fn rate(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn march_bilan() -> MonthlyBilan {
        let mut per_category_counts = BTreeMap::new();
        per_category_counts.insert("Consultation générale".to_string(), 2);
        per_category_counts.insert("Urgence".to_string(), 1);
        MonthlyBilan {
            month: 3,
            year: 2024,
            total_count: 3,
            revenue: "250.00".parse().unwrap(),
            per_category_counts,
            weekly_evolution: [0, 1, 1, 1, 0],
            paid_count: 2,
            unpaid_count: 1,
            unpaid_amount: "80.00".parse().unwrap(),
        }
    }

    #[test]
    fn report_carries_the_headline_numbers() {
        let lines = render_report(&march_bilan());
        let text = lines.join("\n");
        assert!(text.contains("BILAN MENSUEL - Mars 2024"));
        assert!(text.contains("Nombre total de consultations : 3"));
        assert!(text.contains("Chiffre d'affaires            : 250.00 DH"));
        assert!(text.contains("Prix moyen par consultation   : 83.33 DH"));
        assert!(text.contains("Montant des impayés           : 80.00 DH"));
        assert!(text.contains("Taux de paiement              : 66.7%"));
        assert!(text.contains("• Consultation générale : 2"));
        assert!(text.contains("• Urgence : 1"));
    }

    #[test]
    fn empty_month_renders_placeholders_not_omissions() {
        let bilan = MonthlyBilan::empty(7, 2024);
        let lines = render_report(&bilan);
        let text = lines.join("\n");
        assert!(text.contains("CONSULTATIONS PAR CATÉGORIE"));
        assert!(text.contains("Aucune donnée"));
        assert!(text.contains("Nombre total de consultations : 0"));
        assert!(text.contains("Taux de paiement              : 0.0%"));
    }

    #[test]
    fn summary_line_is_compact() {
        assert_eq!(
            summary_line(&march_bilan()),
            "Mars 2024 : 3 consultations, 250.00 DH (66.7% payées)"
        );
    }

    #[test]
    fn weekly_rows_always_list_five_buckets() {
        let rows = weekly_rows(&MonthlyBilan::empty(7, 2024));
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], ("Semaine 1".to_string(), 0));
        assert_eq!(rows[4], ("Semaine 5".to_string(), 0));
    }

    #[test]
    fn category_rows_follow_map_order() {
        let rows = category_rows(&march_bilan());
        assert_eq!(rows[0].0, "Consultation générale");
        assert_eq!(rows[1].0, "Urgence");
        assert!(category_rows(&MonthlyBilan::empty(7, 2024)).is_empty());
    }
}
