//! Preconditions checked before text reaches the analyzer

use crate::error::{Result, SkillGapError};
use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_MIN_RESUME_CHARS: usize = 50;

/// Reject a resume shorter than `min_resume_chars` characters after trimming
/// or a blank job description.
pub fn validate_inputs(resume_text: &str, job_description: &str, min_resume_chars: usize) -> Result<()> {
    let resume_len = resume_text.trim().graphemes(true).count();
    if resume_len < min_resume_chars {
        return Err(SkillGapError::InvalidInput(format!(
            "Resume text must be at least {} characters (got {})",
            min_resume_chars, resume_len
        )));
    }

    if job_description.trim().is_empty() {
        return Err(SkillGapError::InvalidInput(
            "Job description must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_resume_rejected() {
        let err = validate_inputs("  Python dev  ", "Needs Python", DEFAULT_MIN_RESUME_CHARS);
        assert!(matches!(err, Err(SkillGapError::InvalidInput(_))));
    }

    #[test]
    fn test_padding_does_not_count() {
        let resume = format!("{}{}{}", " ".repeat(40), "x".repeat(49), "\n".repeat(10));
        assert!(validate_inputs(&resume, "job", DEFAULT_MIN_RESUME_CHARS).is_err());

        let resume = "x".repeat(50);
        assert!(validate_inputs(&resume, "job", DEFAULT_MIN_RESUME_CHARS).is_ok());
    }

    #[test]
    fn test_blank_job_rejected() {
        let resume = "r".repeat(80);
        assert!(matches!(
            validate_inputs(&resume, " \n\t", DEFAULT_MIN_RESUME_CHARS),
            Err(SkillGapError::InvalidInput(_))
        ));
    }
}
