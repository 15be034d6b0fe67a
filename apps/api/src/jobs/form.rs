//! Application form — turns a web-form submission for one job into dispatcher input.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::applications::models::{Answer, ApplicationFields, CandidateFields};
use crate::jobs::catalog::{JobListing, JobQuestion, QuestionType};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// A file uploaded through the form, base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub content: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormAnswer {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub institute: Option<String>,
    pub currently_pursuing: bool,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
    pub resume: Option<UploadedFile>,
    pub cover_letter: Option<UploadedFile>,
    pub answers: Vec<FormAnswer>,
}

/// Validates the form against `job` and produces the dispatcher record.
///
/// Every problem found is reported, one per entry.
pub fn into_application(
    form: ApplicationForm,
    job: &JobListing,
) -> Result<ApplicationFields, Vec<String>> {
    let mut errors = Vec::new();

    for (value, label) in [
        (&form.first_name, "First Name"),
        (&form.last_name, "Last Name"),
        (&form.email, "Email"),
        (&form.phone, "Phone Number"),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("{label} is required"));
        }
    }

    match &form.resume {
        None => errors.push("Resume/CV is required".to_string()),
        Some(file) => errors.extend(check_upload("Resume/CV", file)),
    }
    if let Some(file) = &form.cover_letter {
        errors.extend(check_upload("Cover Letter", file));
    }

    let answers = build_answers(&job.questions, &form.answers, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    let attachment = form.resume.as_ref().map(|file| json!(file));
    let metadata = form
        .cover_letter
        .as_ref()
        .map(|file| json!({ "coverLetter": file.filename }));

    Ok(ApplicationFields {
        job_id: job.id.clone(),
        initial_stage_id: job.initial_stage_id().to_string(),
        candidate_id: None,
        candidate: CandidateFields {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone: form.phone,
            title: form.title,
            company: form.company,
            degree: form.degree,
            major: form.major,
            institute: form.institute,
            currently_pursuing: Some(form.currently_pursuing),
            address_line1: form.address_line1,
            city: form.city,
            state: form.state,
            country: form.country,
            zip_code: form.zip_code,
            work_address: None,
            permanent_address: None,
            links: None,
        },
        answers: Some(answers).filter(|a| !a.is_empty()),
        metadata,
        attachment,
        source: None,
    })
}

fn check_upload(label: &str, file: &UploadedFile) -> Vec<String> {
    let mut errors = Vec::new();

    let extension = file
        .filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    if !extension
        .as_deref()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext))
    {
        errors.push(format!("{label} must be a PDF, DOC or DOCX file"));
    }

    match STANDARD.decode(file.content.as_bytes()) {
        Ok(bytes) if bytes.is_empty() => errors.push(format!("{label} is empty")),
        Ok(bytes) if bytes.len() > MAX_UPLOAD_BYTES => {
            errors.push(format!("{label} exceeds the 10MB limit"))
        }
        Ok(_) => {}
        Err(_) => errors.push(format!("{label} content is not valid base64")),
    }

    errors
}

fn build_answers(
    questions: &[JobQuestion],
    given: &[FormAnswer],
    errors: &mut Vec<String>,
) -> Vec<Answer> {
    let mut answers = Vec::with_capacity(questions.len());

    for question in questions {
        let value = given
            .iter()
            .find(|a| a.question_id == question.id)
            .map(|a| a.answer.trim())
            .filter(|a| !a.is_empty());

        let Some(value) = value else {
            if question.required {
                errors.push(format!("Answer to \"{}\" is required", question.title));
            }
            continue;
        };

        let multiple_choice_answers = match question.kind {
            QuestionType::YesNo => {
                if value != "Yes" && value != "No" {
                    errors.push(format!(
                        "Answer to \"{}\" must be Yes or No",
                        question.title
                    ));
                    continue;
                }
                Some(vec![value.to_string()])
            }
            QuestionType::Text => None,
        };

        answers.push(Answer {
            id: question.id.clone(),
            question: question.title.clone(),
            answer: Value::String(value.to_string()),
            kind: question.kind.as_str().to_string(),
            multiple_choice_answers,
            extra: Map::new(),
        });
    }

    answers
}
