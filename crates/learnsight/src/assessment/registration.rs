use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::Demographics;

pub const MIN_AGE: i32 = 16;
pub const MAX_AGE: i32 = 100;
const DEFAULT_MAX_SEMESTERS: u8 = 10;

/// Course offered on the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub id: &'static str,
    pub name: &'static str,
    pub semesters: u8,
}

pub fn standard_courses() -> Vec<Course> {
    vec![
        Course {
            id: "bsc-psychology",
            name: "B.Sc. Psychology",
            semesters: 6,
        },
        Course {
            id: "ba-education",
            name: "B.A. Education",
            semesters: 6,
        },
        Course {
            id: "btech-cse",
            name: "B.Tech Computer Science",
            semesters: 8,
        },
        Course {
            id: "bba",
            name: "Bachelor of Business Administration",
            semesters: 6,
        },
        Course {
            id: "mba",
            name: "Master of Business Administration",
            semesters: 4,
        },
        Course {
            id: "mbbs",
            name: "MBBS",
            semesters: 10,
        },
    ]
}

/// Raw registration form as submitted; numeric fields stay optional until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub semester: Option<i32>,
}

/// Field-keyed validation messages for a rejected registration form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct RegistrationError {
    pub fields: BTreeMap<&'static str, String>,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        write!(f, "registration is invalid ({})", details.join("; "))
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[\w\-.]+@([\w-]+\.)+[\w-]{2,4}$").expect("email pattern compiles")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

pub fn validate_registration(
    form: &RegistrationForm,
    courses: &[Course],
) -> Result<Demographics, RegistrationError> {
    let mut fields = BTreeMap::new();

    let name = form.name.trim();
    if name.is_empty() {
        fields.insert("name", "Name is required.".to_string());
    }

    let age = form
        .age
        .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
        .map(|age| age as u8);
    if age.is_none() {
        fields.insert(
            "age",
            format!("Age must be a number between {MIN_AGE} and {MAX_AGE}."),
        );
    }

    let email = form.email.trim();
    if email.is_empty() {
        fields.insert("email", "Email is required.".to_string());
    } else if !is_valid_email(email) {
        fields.insert("email", "Invalid email format.".to_string());
    }

    let gender = form.gender.trim();
    if gender.is_empty() {
        fields.insert("gender", "Gender is required.".to_string());
    }
    let city = form.city.trim();
    if city.is_empty() {
        fields.insert("city", "City is required.".to_string());
    }

    let course = courses
        .iter()
        .find(|course| course.id == form.course_id.trim());
    if course.is_none() {
        fields.insert("course_id", "Course is required.".to_string());
    }

    let max_semesters = course.map_or(DEFAULT_MAX_SEMESTERS, |course| course.semesters);
    let semester = form
        .semester
        .filter(|semester| (1..=i32::from(max_semesters)).contains(semester))
        .map(|semester| semester as u8);
    if semester.is_none() {
        let message = if form.semester.is_none() {
            "Semester is required.".to_string()
        } else {
            format!("Semester must be between 1 and {max_semesters}.")
        };
        fields.insert("semester", message);
    }

    match (age, course, semester) {
        (Some(age), Some(course), Some(semester)) if fields.is_empty() => Ok(Demographics {
            name: name.to_string(),
            email: email.to_string(),
            age,
            gender: gender.to_string(),
            city: city.to_string(),
            course_id: course.id.to_string(),
            course_name: course.name.to_string(),
            semester,
        }),
        _ => Err(RegistrationError { fields }),
    }
}

/// Opaque token handed to the respondent alongside the session id.
pub fn session_token(now: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("session_{}_{}", now.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Asha Rao".to_string(),
            email: "asha.rao@example.edu".to_string(),
            age: Some(19),
            gender: "Female".to_string(),
            city: "Pune".to_string(),
            course_id: "bsc-psychology".to_string(),
            semester: Some(3),
        }
    }

    #[test]
    fn valid_form_resolves_course_name() {
        let demographics = validate_registration(&form(), &standard_courses()).expect("valid");
        assert_eq!(demographics.course_name, "B.Sc. Psychology");
        assert_eq!(demographics.age, 19);
        assert_eq!(demographics.semester, 3);
    }

    #[test]
    fn age_must_fall_within_bounds() {
        for age in [Some(15), Some(101), None] {
            let mut form = form();
            form.age = age;
            let error = validate_registration(&form, &standard_courses()).expect_err("invalid");
            assert!(error.fields.contains_key("age"), "age {age:?}");
        }
    }

    #[test]
    fn email_format_is_checked() {
        assert!(is_valid_email("first.last@uni.ac.in"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("someone@domain"));

        let mut form = form();
        form.email = "broken@".to_string();
        let error = validate_registration(&form, &standard_courses()).expect_err("invalid");
        assert_eq!(error.fields["email"], "Invalid email format.");
    }

    #[test]
    fn semester_is_bounded_by_course_length() {
        let mut form = form();
        form.course_id = "mba".to_string();
        form.semester = Some(5);
        let error = validate_registration(&form, &standard_courses()).expect_err("invalid");
        assert!(error.fields["semester"].contains("between 1 and 4"));
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let error = validate_registration(&RegistrationForm::default(), &standard_courses())
            .expect_err("empty form is invalid");
        for field in ["name", "email", "age", "gender", "city", "course_id", "semester"] {
            assert!(error.fields.contains_key(field), "missing {field}");
        }
        assert!(error.to_string().contains("Email is required."));
    }

    #[test]
    fn session_tokens_carry_timestamp_and_suffix() {
        let now = Utc::now();
        let token = session_token(now);
        let parts: Vec<&str> = token.split('_').collect();
        assert_eq!(parts[0], "session");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 9);
    }
}
