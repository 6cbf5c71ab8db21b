use crate::error::{AppError, AppResult};
use crate::models::submission::Submission;
use std::path::{Path, PathBuf};
use tokio::fs;

/// TOML 파일 하나를 읽어 Submission 으로 변환 (PDF 바이트 포함)
pub async fn load_submission(toml_file_path: &Path) -> AppResult<Submission> {
    let display = toml_file_path.display().to_string();
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file(&display, e))?;

    let mut submission: Submission = toml::from_str(&content).map_err(|e| AppError::Toml {
        path: display.clone(),
        source: e,
    })?;

    // PDF 경로는 TOML 파일 위치 기준
    let pdf_path = resolve_relative(toml_file_path, &submission.pdf_path);
    if !submission.pdf_path.trim().is_empty() {
        submission.pdf_bytes = fs::read(&pdf_path)
            .await
            .map_err(|e| AppError::file(pdf_path.display().to_string(), e))?;
    }

    submission.file_path = Some(display);

    Ok(submission)
}

/// 폴더 안의 모든 TOML 제출 파일을 이름순으로 읽는다
///
/// 읽기에 실패한 파일은 경고만 남기고 건너뛴다.
pub async fn load_all_submissions(folder_path: &str) -> AppResult<Vec<Submission>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::file(
            folder_path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "폴더가 없습니다"),
        ));
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file(folder_path, e))?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut submissions = Vec::new();
    for path in toml_files {
        tracing::info!(
            "불러오는 중: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_submission(&path).await {
            Ok(submission) => submissions.push(submission),
            Err(e) => {
                tracing::warn!("제출 파일 읽기 실패 {}: {}", path.display(), e);
            }
        }
    }

    Ok(submissions)
}

fn resolve_relative(toml_file_path: &Path, relative: &str) -> PathBuf {
    let candidate = Path::new(relative.trim());
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    toml_file_path
        .parent()
        .map(|dir| dir.join(candidate))
        .unwrap_or_else(|| candidate.to_path_buf())
}
