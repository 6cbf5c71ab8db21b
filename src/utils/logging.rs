use anyhow::Result;
/// 로그 유틸리티 모듈
///
/// 로거 초기화와 실행 로그 출력 보조 함수
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// tracing 구독자 초기화
///
/// `RUST_LOG` 가 있으면 그 값을, 없으면 `verbose` 에 따라 debug/info 를 쓴다.
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 실행 로그 파일 초기화
///
/// # 인자
/// - `log_file_path`: 로그 파일 경로
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n컨설팅 보고서 생성 로그 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 실행 로그 파일에 한 줄 추가
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        line
    )?;
    Ok(())
}

/// 프로그램 시작 정보
pub fn log_startup(submissions_folder: &str, auto_format: bool) {
    info!("{}", "=".repeat(60));
    info!("🌟 학생부 컨설팅 보고서 생성 시작");
    info!("📁 제출 폴더: {}", submissions_folder);
    info!(
        "🎨 자동 서식 적용: {}",
        if auto_format { "ON" } else { "OFF" }
    );
    info!("{}", "=".repeat(60));
}

/// 제출 처리 시작
pub fn log_submission_start(index: usize, total: usize, label: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📄 제출 {}/{} 처리 시작: {}", index, total, label);
    info!("{}", "─".repeat(60));
}

/// 최종 통계 출력
///
/// # 인자
/// - `success`: 성공 수
/// - `failed`: 실패 수
/// - `total`: 전체 수
/// - `log_file_path`: 로그 파일 경로
pub fn print_final_stats(success: usize, failed: usize, total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 전체 처리 결과");
    info!(
        "완료 시간: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 성공: {}/{}", success, total);
    info!("❌ 실패: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n로그 저장 위치: {}", log_file_path);
}

/// 로그 미리보기용 텍스트 자르기
///
/// # 인자
/// - `text`: 원문
/// - `max_len`: 최대 글자 수
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_text("홍길동", 5), "홍길동");
        assert_eq!(truncate_text("가나다라마바", 3), "가나다...");
    }

    #[test]
    fn log_file_gets_header_and_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        let path = path.to_str().unwrap();

        init_log_file(path).unwrap();
        append_log_line(path, "10305_홍길동 완료").unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("컨설팅 보고서 생성 로그"));
        assert!(content.contains("10305_홍길동 완료"));
    }
}
