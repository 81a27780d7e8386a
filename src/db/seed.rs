//! Idempotent bootstrap of the grade/subject/lesson catalog.

use crate::db::sqlite::Storage;
use crate::error::AppError;
use tracing::info;

pub const GRADE_COUNT: i64 = 9;
pub const SUBJECT_NAMES: [&str; 3] = ["Mathematics", "Science", "English"];
pub const LESSONS_PER_SUBJECT: i64 = 20;

#[derive(Debug, Clone)]
pub struct SeedGrade {
    pub name: String,
    pub subjects: Vec<SeedSubject>,
}

#[derive(Debug, Clone)]
pub struct SeedSubject {
    pub name: String,
    pub lessons: Vec<SeedLesson>,
}

#[derive(Debug, Clone)]
pub struct SeedLesson {
    pub title: String,
    pub description: Option<String>,
    pub video_path: Option<String>,
    pub notes_path: Option<String>,
    pub sort_order: i64,
}

/// The default catalog: every grade carries the same fixed subjects, each
/// with the same number of ordered lessons.
pub fn default_catalog() -> Vec<SeedGrade> {
    (1..=GRADE_COUNT)
        .map(|g| SeedGrade {
            name: format!("Grade {g}"),
            subjects: SUBJECT_NAMES
                .iter()
                .map(|subject| SeedSubject {
                    name: subject.to_string(),
                    lessons: (1..=LESSONS_PER_SUBJECT)
                        .map(|n| {
                            let slug = subject.to_lowercase();
                            SeedLesson {
                                title: format!("Lesson {n}"),
                                description: Some(format!("{subject} lesson {n} for grade {g}")),
                                video_path: Some(format!("videos/grade{g}/{slug}/lesson{n}.mp4")),
                                notes_path: Some(format!("notes/grade{g}/{slug}/lesson{n}.pdf")),
                                sort_order: n,
                            }
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

/// Populate the catalog on first run. Gated on "does any grade row exist",
/// so running startup twice never duplicates rows.
pub async fn seed(storage: &Storage) -> Result<(), AppError> {
    if storage.has_grades().await? {
        info!("catalog already seeded; skipping");
        return Ok(());
    }

    storage.insert_catalog(&default_catalog()).await?;

    info!(
        grades = storage.count_grades().await?,
        subjects = storage.count_subjects().await?,
        lessons = storage.count_lessons().await?,
        "seeded catalog"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_shape() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), GRADE_COUNT as usize);
        for grade in &catalog {
            assert_eq!(grade.subjects.len(), SUBJECT_NAMES.len());
            for subject in &grade.subjects {
                assert_eq!(subject.lessons.len(), LESSONS_PER_SUBJECT as usize);
                let orders: Vec<i64> = subject.lessons.iter().map(|l| l.sort_order).collect();
                assert_eq!(orders, (1..=LESSONS_PER_SUBJECT).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn first_grade_is_named_for_its_position() {
        let catalog = default_catalog();
        assert_eq!(catalog[0].name, "Grade 1");
        assert_eq!(catalog[8].name, "Grade 9");
    }
}
