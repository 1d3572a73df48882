//! Client-side validation for the job form and resume upload.

use std::fmt;

use crate::{Job, JobDraft};

pub const MAX_SKILLS: usize = 20;
pub const MAX_RESUME_BYTES: u64 = 16 * 1024 * 1024;

const COMPANY_PLACEHOLDER: &str = "Company Not Specified";
const LOCATION_PLACEHOLDER: &str = "Location Not Specified";
const SALARY_PLACEHOLDER: &str = "Salary Not Specified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TitleRequired,
    SkillsRequired,
    ExperienceRequired,
    TooManySkills { count: usize },
    NoResumeSelected,
    ResumeTooLarge { size_bytes: u64 },
    ResumeNotPdf,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TitleRequired => f.write_str("Job title is required"),
            ValidationError::SkillsRequired => f.write_str("Skills are required"),
            ValidationError::ExperienceRequired => {
                f.write_str("Experience requirement is required")
            }
            ValidationError::TooManySkills { .. } => {
                write!(f, "Maximum {MAX_SKILLS} skills allowed")
            }
            ValidationError::NoResumeSelected => f.write_str("Please select a resume file."),
            ValidationError::ResumeTooLarge { .. } => {
                f.write_str("File size too large. Maximum size is 16MB.")
            }
            ValidationError::ResumeNotPdf => f.write_str("Only PDF files are allowed."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobField {
    Title,
    Company,
    Location,
    Description,
    Requirements,
    Salary,
    Skills,
    Experience,
}

/// Raw text of the job posting form. `skills` is comma-separated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobForm {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary: String,
    pub skills: String,
    pub experience: String,
}

impl JobForm {
    pub fn set(&mut self, field: JobField, value: String) {
        let slot = match field {
            JobField::Title => &mut self.title,
            JobField::Company => &mut self.company,
            JobField::Location => &mut self.location,
            JobField::Description => &mut self.description,
            JobField::Requirements => &mut self.requirements,
            JobField::Salary => &mut self.salary,
            JobField::Skills => &mut self.skills,
            JobField::Experience => &mut self.experience,
        };
        *slot = value;
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(ValidationError::TitleRequired);
        }
        let skills = self.skills.trim();
        if skills.is_empty() {
            errors.push(ValidationError::SkillsRequired);
        }
        if self.experience.trim().is_empty() {
            errors.push(ValidationError::ExperienceRequired);
        }
        // Counts raw comma-separated segments, empty ones included.
        let count = self.skills.split(',').count();
        if !skills.is_empty() && count > MAX_SKILLS {
            errors.push(ValidationError::TooManySkills { count });
        }
        errors
    }

    /// Builds the outgoing payload, filling placeholders for optional fields.
    pub fn to_draft(&self) -> JobDraft {
        let title = self.title.trim();
        let skills_text = self.skills.trim();
        JobDraft {
            title: title.to_string(),
            company: or_fallback(&self.company, COMPANY_PLACEHOLDER),
            location: or_fallback(&self.location, LOCATION_PLACEHOLDER),
            description: or_fallback(&self.description, title),
            requirements: or_fallback(&self.requirements, skills_text),
            salary: or_fallback(&self.salary, SALARY_PLACEHOLDER),
            skills: self
                .skills
                .split(',')
                .map(|skill| skill.trim().to_lowercase())
                .filter(|skill| !skill.is_empty())
                .collect(),
            experience: self.experience.trim().to_string(),
        }
    }

    /// Loads an existing job for editing, turning placeholders back into
    /// empty fields.
    pub fn from_job(job: &Job) -> Self {
        let skills = job.skills.join(", ");
        Self {
            title: job.title.clone(),
            company: blank_if(&job.company, COMPANY_PLACEHOLDER),
            location: blank_if(&job.location, LOCATION_PLACEHOLDER),
            description: blank_if(&job.description, &job.title),
            requirements: blank_if(&job.requirements, &skills),
            salary: blank_if(&job.salary, SALARY_PLACEHOLDER),
            skills,
            experience: job.experience.clone(),
        }
    }
}

fn or_fallback(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn blank_if(value: &str, placeholder: &str) -> String {
    if value == placeholder {
        String::new()
    } else {
        value.to_string()
    }
}

/// A resume chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeSelection {
    pub path: String,
    pub file_name: String,
    pub size_bytes: u64,
}

pub fn validate_resume(selection: Option<&ResumeSelection>) -> Result<(), ValidationError> {
    let Some(selection) = selection else {
        return Err(ValidationError::NoResumeSelected);
    };
    if selection.size_bytes > MAX_RESUME_BYTES {
        return Err(ValidationError::ResumeTooLarge {
            size_bytes: selection.size_bytes,
        });
    }
    if !selection.file_name.to_lowercase().ends_with(".pdf") {
        return Err(ValidationError::ResumeNotPdf);
    }
    Ok(())
}
