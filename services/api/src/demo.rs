use crate::infra::{InMemoryAssessmentRepository, InMemoryProgressStore};
use chrono::{Local, NaiveDate};
use clap::Args;
use learnsight::assessment::{
    AssessmentService, AssessmentServiceError, InProgressAttempt, InstrumentResult, Registration,
    RegistrationForm,
};
use learnsight::config::AppConfig;
use learnsight::error::AppError;
use learnsight::export::{CompletionFilter, ExportType, RespondentFilter};
use learnsight::instruments::{
    EiCategory, EmotionalIntelligenceDraft, InstrumentCatalog, LearningStyle, LearningStyleDraft,
    SensoryPreferenceDraft,
};
use std::path::PathBuf;
use std::sync::Arc;

pub(crate) type DemoService =
    AssessmentService<InMemoryAssessmentRepository, InMemoryProgressStore>;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of respondents to seed
    #[arg(long, default_value_t = 6)]
    pub(crate) respondents: usize,
    /// Directory for the CSV exports (defaults to APP_EXPORT_DIR)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Reporting date used in export filenames (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print results without writing any CSV files
    #[arg(long)]
    pub(crate) skip_exports: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// summary, vak-detail, ei-detail, rep-detail or comprehensive
    #[arg(value_parser = parse_export_type)]
    pub(crate) export_type: ExportType,
    /// Directory for the CSV file (defaults to APP_EXPORT_DIR)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Number of respondents in the seeded dataset
    #[arg(long, default_value_t = 6)]
    pub(crate) respondents: usize,
    /// Case-insensitive match on name, email or course
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Course id or course name
    #[arg(long)]
    pub(crate) course: Option<String>,
    #[arg(long)]
    pub(crate) semester: Option<u8>,
    /// all, completed, incomplete, partial or vak-only
    #[arg(long, default_value = "all", value_parser = parse_completion)]
    pub(crate) completion: CompletionFilter,
    /// Reporting date used in the filename (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn parse_export_type(raw: &str) -> Result<ExportType, String> {
    raw.parse::<ExportType>().map_err(|err| err.to_string())
}

fn parse_completion(raw: &str) -> Result<CompletionFilter, String> {
    raw.parse::<CompletionFilter>()
}

struct DemoProfile {
    name: &'static str,
    email: &'static str,
    age: i32,
    gender: &'static str,
    city: &'static str,
    course_id: &'static str,
    semester: i32,
    /// Instruments submitted, in order: 0 registers only, 3 completes everything.
    submitted: usize,
}

const PROFILES: [DemoProfile; 6] = [
    DemoProfile {
        name: "Asha Rao",
        email: "asha.rao@example.edu",
        age: 20,
        gender: "Female",
        city: "Pune",
        course_id: "bsc-psychology",
        semester: 4,
        submitted: 3,
    },
    DemoProfile {
        name: "Ravi Menon",
        email: "ravi.menon@example.edu",
        age: 22,
        gender: "Male",
        city: "Kochi",
        course_id: "btech-cse",
        semester: 7,
        submitted: 3,
    },
    DemoProfile {
        name: "Meera Iyer",
        email: "meera.iyer@example.edu",
        age: 24,
        gender: "Female",
        city: "Chennai",
        course_id: "mba",
        semester: 2,
        submitted: 1,
    },
    DemoProfile {
        name: "Karan Singh",
        email: "karan.singh@example.edu",
        age: 19,
        gender: "Male",
        city: "Jaipur",
        course_id: "bba",
        semester: 1,
        submitted: 2,
    },
    DemoProfile {
        name: "Nisha Patel",
        email: "nisha.patel@example.edu",
        age: 21,
        gender: "Female",
        city: "Ahmedabad",
        course_id: "ba-education",
        semester: 5,
        submitted: 3,
    },
    DemoProfile {
        name: "Arjun Das",
        email: "arjun.das@example.edu",
        age: 23,
        gender: "Prefer not to say",
        city: "Kolkata",
        course_id: "mbbs",
        semester: 9,
        submitted: 0,
    },
];

pub(crate) fn demo_service() -> DemoService {
    AssessmentService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(InMemoryProgressStore::default()),
    )
}

fn profile_form(index: usize) -> RegistrationForm {
    let profile = &PROFILES[index % PROFILES.len()];
    let round = index / PROFILES.len();
    let email = if round == 0 {
        profile.email.to_string()
    } else {
        profile.email.replacen('@', &format!(".{round}@"), 1)
    };
    RegistrationForm {
        name: profile.name.to_string(),
        email,
        age: Some(profile.age),
        gender: profile.gender.to_string(),
        city: profile.city.to_string(),
        course_id: profile.course_id.to_string(),
        semester: Some(profile.semester),
    }
}

/// Mostly the respondent's preferred style, with every third answer drifting to the next one.
fn learning_style_draft(catalog: &InstrumentCatalog, index: usize) -> LearningStyleDraft {
    let styles = LearningStyle::ordered();
    (0..catalog.learning_style().len())
        .map(|question| {
            let offset = usize::from(question % 3 == 2);
            let style = styles[(index + offset) % styles.len()];
            (question, style.code().to_string())
        })
        .collect()
}

fn emotional_intelligence_draft(
    catalog: &InstrumentCatalog,
    index: usize,
) -> EmotionalIntelligenceDraft {
    (0..catalog.emotional_intelligence().len())
        .map(|statement| (statement, ((index + statement * 3) % 5) as i32 + 1))
        .collect()
}

/// Each question gets a rotation of 1..=4 across its options.
fn sensory_preference_draft(catalog: &InstrumentCatalog, index: usize) -> SensoryPreferenceDraft {
    catalog
        .sensory_preference()
        .iter()
        .enumerate()
        .map(|(question, item)| {
            let ranks = (0..item.options.len())
                .map(|option| (option, ((option + index + question) % 4) as i32 + 1))
                .collect();
            (question, ranks)
        })
        .collect()
}

/// Register `count` respondents and submit a staggered mix of instruments for each.
pub(crate) fn seed_demo_dataset(
    service: &DemoService,
    count: usize,
) -> Result<Vec<Registration>, AssessmentServiceError> {
    let mut registrations = Vec::with_capacity(count);
    for index in 0..count {
        let registration = service.register(profile_form(index))?;
        let respondent_id = &registration.respondent.id;
        let session_id = &registration.session.id;
        let submitted = PROFILES[index % PROFILES.len()].submitted;
        let catalog = service.catalog();

        if submitted >= 1 {
            service.submit_learning_style(
                respondent_id,
                session_id,
                &learning_style_draft(catalog, index),
            )?;
        }
        if submitted >= 2 {
            service.submit_emotional_intelligence(
                respondent_id,
                session_id,
                &emotional_intelligence_draft(catalog, index),
            )?;
        }
        if submitted >= 3 {
            service.submit_sensory_preference(
                respondent_id,
                session_id,
                &sensory_preference_draft(catalog, index),
            )?;
        }
        if submitted < 2 {
            let mut attempt = InProgressAttempt::default();
            for (statement, rating) in emotional_intelligence_draft(catalog, index)
                .into_iter()
                .take(4)
            {
                attempt.rate_statement(statement, rating);
            }
            attempt.emotional_intelligence.position = 4;
            service.save_progress(session_id, &attempt)?;
        }
        registrations.push(registration);
    }
    Ok(registrations)
}

fn resolve_export_dir(output: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match output {
        Some(dir) => Ok(dir),
        None => Ok(AppConfig::load()?.storage.export_dir),
    }
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        export_type,
        output,
        respondents,
        search,
        course,
        semester,
        completion,
        today,
    } = args;

    let service = demo_service();
    seed_demo_dataset(&service, respondents)?;

    let filter = RespondentFilter {
        search,
        course,
        semester,
        completion,
    };
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let file = service.export(export_type, &filter, today)?;
    let dir = resolve_export_dir(output)?;
    let path = file.write_to(&dir)?;

    println!(
        "Exported {} {} row(s) to {}",
        file.rows,
        export_type,
        path.display()
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        respondents,
        output,
        today,
        skip_exports,
    } = args;

    let service = demo_service();
    println!("Questionnaire demo");
    let registrations = seed_demo_dataset(&service, respondents)?;

    for registration in &registrations {
        let demographics = &registration.respondent.demographics;
        let completion = service.completion(&registration.session.id)?;
        println!(
            "\n{} ({}, semester {})",
            demographics.name, demographics.course_name, demographics.semester
        );
        println!(
            "- VAK {} | EI {} | Rep System {} | all {}",
            yes_no(completion.vak_completed),
            yes_no(completion.ei_completed),
            yes_no(completion.rep_system_completed),
            yes_no(completion.all_completed)
        );
        render_results(&service, registration)?;
    }

    let stats = service.dashboard_stats(&RespondentFilter::default())?;
    println!("\nDashboard");
    println!(
        "- {} respondents | {} completed | VAK {} | EI {} | Rep System {}",
        stats.total_respondents,
        stats.completed,
        stats.vak_completed,
        stats.ei_completed,
        stats.rep_system_completed
    );

    if skip_exports {
        return Ok(());
    }

    let dir = resolve_export_dir(output)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    println!("\nExports");
    for export_type in ExportType::ordered() {
        match service.export(export_type, &RespondentFilter::default(), today) {
            Ok(file) => {
                let path = file.write_to(&dir)?;
                println!("- {}: {} row(s) -> {}", export_type, file.rows, path.display());
            }
            Err(AssessmentServiceError::Export(err)) => {
                println!("- {}: skipped ({})", export_type, err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn render_results(service: &DemoService, registration: &Registration) -> Result<(), AppError> {
    for result in service.results(&registration.session.id)? {
        match result {
            InstrumentResult::LearningStyle(result) => println!(
                "  Learning style: {} (V {} / A {} / K {})",
                result.dominant_style.label(),
                result.scores.visual,
                result.scores.auditory,
                result.scores.kinesthetic
            ),
            InstrumentResult::EmotionalIntelligence(result) => {
                println!("  Emotional intelligence: {} / 250", result.scores.total);
                for category in EiCategory::ordered() {
                    println!(
                        "    - {}: {} ({})",
                        category.label(),
                        result.scores.score(category),
                        result.scores.classification(category).label()
                    );
                }
            }
            InstrumentResult::SensoryPreference(result) => {
                let scores: Vec<String> = result
                    .scores
                    .entries()
                    .iter()
                    .map(|(system, score)| format!("{} {}", system.code(), score))
                    .collect();
                println!(
                    "  Representational system: {} ({})",
                    result.dominant_system.label(),
                    scores.join(" / ")
                );
            }
        }
    }
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    }

    #[test]
    fn seeded_dataset_mixes_completion_states() {
        let service = demo_service();
        let registrations = seed_demo_dataset(&service, 6).expect("dataset seeds");
        assert_eq!(registrations.len(), 6);

        let stats = service
            .dashboard_stats(&RespondentFilter::default())
            .expect("stats computed");
        assert_eq!(stats.total_respondents, 6);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.vak_completed, 5);
        assert_eq!(stats.ei_completed, 4);
        assert_eq!(stats.rep_system_completed, 3);

        let meera = &registrations[2];
        let saved = service
            .load_progress(&meera.session.id)
            .expect("progress loads")
            .expect("partial attempt saved");
        assert_eq!(saved.emotional_intelligence.position, 4);
    }

    #[test]
    fn larger_datasets_keep_emails_distinct() {
        let service = demo_service();
        let registrations = seed_demo_dataset(&service, 8).expect("dataset seeds");
        assert_eq!(
            registrations[6].respondent.demographics.email,
            "asha.rao.1@example.edu"
        );
    }

    #[test]
    fn export_command_writes_filtered_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        run_export(ExportArgs {
            export_type: ExportType::Summary,
            output: Some(dir.path().to_path_buf()),
            respondents: 6,
            search: None,
            course: Some("mba".to_string()),
            semester: None,
            completion: CompletionFilter::VakOnly,
            today: Some(today()),
        })
        .expect("export succeeds");

        let content = std::fs::read_to_string(dir.path().join("summary_export_2025-03-14.csv"))
            .expect("export written");
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"Meera Iyer\""));
    }

    #[test]
    fn export_command_reports_empty_selection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = run_export(ExportArgs {
            export_type: ExportType::RepDetail,
            output: Some(dir.path().to_path_buf()),
            respondents: 6,
            search: Some("Meera".to_string()),
            course: None,
            semester: None,
            completion: CompletionFilter::All,
            today: Some(today()),
        });
        assert!(matches!(
            result,
            Err(AppError::Export(learnsight::export::ExportError::Empty { .. }))
        ));
    }
}
