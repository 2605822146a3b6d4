//! Static seed: the five renewable-energy modules and starting counters.

use chrono::{DateTime, Utc};

use super::content::{ContentDraft, ContentFields, ContentItem, ContentType, SYSTEM_UPLOADER};
use super::module::Module;
use super::stats::Stats;

/// Seed modules, with seed content stamped at `uploaded_at`
pub fn seed_modules(uploaded_at: DateTime<Utc>) -> Vec<Module> {
    let seed_item = |title: &str, description: &str, fields: ContentFields| {
        ContentItem::from_draft(
            "1",
            ContentDraft::new(title, description).with_fields(fields),
            uploaded_at,
            SYSTEM_UPLOADER,
        )
    };

    let solar_pv = Module::new(
        "solar-pv",
        "Solar PV",
        "Photovoltaic Systems & Technology",
        "☀️",
        "linear-gradient(135deg, #f59e0b 0%, #d97706 100%)",
    )
    .with_item(
        ContentType::Videos,
        seed_item(
            "Introduction to Solar PV",
            "Basic concepts and principles",
            ContentFields {
                duration: Some("15 min".to_string()),
                ..Default::default()
            },
        ),
    )
    .with_item(
        ContentType::Textbooks,
        seed_item(
            "Solar Energy Engineering",
            "Comprehensive guide to PV systems",
            ContentFields::default(),
        ),
    )
    .with_item(
        ContentType::Projects,
        seed_item(
            "Basic Solar Cell Testing",
            "Measure I-V characteristics",
            ContentFields {
                instructions: Some(
                    "Follow the lab manual to test solar cell characteristics".to_string(),
                ),
                ..Default::default()
            },
        ),
    )
    .with_item(
        ContentType::Assignments,
        seed_item(
            "Assignment 1: Solar Irradiance",
            "Due: March 15 - Calculate daily irradiance",
            ContentFields {
                due_date: Some("2024-03-15".to_string()),
                instructions: Some(
                    "Calculate the daily solar irradiance for your location".to_string(),
                ),
                ..Default::default()
            },
        ),
    )
    .with_item(
        ContentType::Quizzes,
        seed_item(
            "Quiz 1: Fundamentals",
            "Score: 85% - Retake available",
            ContentFields {
                status: Some("✅".to_string()),
                questions: Some(Vec::new()),
                ..Default::default()
            },
        ),
    );

    vec![
        solar_pv,
        Module::new(
            "wind-power",
            "Wind Power",
            "Wind Turbines & Energy Generation",
            "💨",
            "linear-gradient(135deg, #3b82f6 0%, #1d4ed8 100%)",
        ),
        Module::new(
            "hydropower",
            "Hydropower",
            "Water-based Energy Systems",
            "💧",
            "linear-gradient(135deg, #06b6d4 0%, #0891b2 100%)",
        ),
        Module::new(
            "geothermal",
            "Geothermal",
            "Earth's Heat Energy Systems",
            "🌋",
            "linear-gradient(135deg, #dc2626 0%, #991b1b 100%)",
        ),
        Module::new(
            "solar-thermal",
            "Solar Thermal",
            "Heat Collection & Storage Systems",
            "🔥",
            "linear-gradient(135deg, #ea580c 0%, #c2410c 100%)",
        ),
    ]
}

pub fn seed_stats() -> Stats {
    Stats {
        total_students: 142,
        active_students: 128,
        average_progress: 67,
        completion_rate: 84,
        total_modules: 5,
        total_assignments: 15,
        submitted_assignments: 89,
        average_score: 78,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_module_ids_are_unique() {
        let modules = seed_modules(Utc::now());
        let mut ids: Vec<_> = modules.iter().map(|m| m.id.as_str()).collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 5);
        assert_eq!(seed_stats().total_modules as usize, modules.len());
    }

    #[test]
    fn test_only_solar_pv_has_seed_content() {
        let modules = seed_modules(Utc::now());

        assert_eq!(modules[0].id, "solar-pv");
        assert_eq!(modules[0].total_items(), 5);
        assert!(modules[1..].iter().all(|m| m.total_items() == 0));
    }
}
