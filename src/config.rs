use std::time::Duration;

use crate::error::ConfigError;

/// 프로그램 설정
///
/// 모든 값은 환경 변수(또는 배포 환경의 secret)에서 읽는다.
#[derive(Clone, Debug)]
pub struct Config {
    // --- 생성 모델 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// 1단계(보고서) 모델
    pub model_report: String,
    /// 2단계(요약) 모델
    pub model_summary: String,
    /// 3단계(지도방침) 모델
    pub model_guide: String,

    // --- Google 문서 ---
    pub template_report_doc_id: String,
    pub template_guide_doc_id: String,
    /// 비어 있으면 기본 위치(내 드라이브)에 둔다
    pub drive_folder_id_report: String,
    pub drive_folder_id_guide: String,
    pub google_access_token: String,

    // --- 스프레드시트 기록 ---
    pub sheets_id: String,
    pub sheets_tab: String,

    // --- 자동 서식 웹훅 ---
    pub gas_webapp_url: String,
    pub gas_token: String,
    pub auto_gas_format: bool,

    /// 비어 있지 않으면 제출마다 같은 코드를 요구한다
    pub access_code: String,

    /// 제출 TOML 파일 폴더
    pub submissions_folder: String,
    /// 실행 결과 로그 파일
    pub output_log_file: String,
    pub verbose_logging: bool,

    pub rate_limit_max: usize,
    pub rate_limit_window_secs: u64,
    pub max_retries: u32,
    pub guidance_max_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model_report: "gemini-2.5-pro".to_string(),
            model_summary: "gemini-2.5-flash".to_string(),
            model_guide: "gemini-2.5-pro".to_string(),
            template_report_doc_id: String::new(),
            template_guide_doc_id: String::new(),
            drive_folder_id_report: String::new(),
            drive_folder_id_guide: String::new(),
            google_access_token: String::new(),
            sheets_id: String::new(),
            sheets_tab: "컨설팅 보고서".to_string(),
            gas_webapp_url: String::new(),
            gas_token: String::new(),
            auto_gas_format: false,
            access_code: String::new(),
            submissions_folder: "submissions".to_string(),
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
            rate_limit_max: 2,
            rate_limit_window_secs: 60,
            max_retries: 6,
            guidance_max_bytes: 9000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            llm_api_key: env_or("GEMINI_API_KEY", default.llm_api_key),
            llm_api_base_url: env_or("LLM_API_BASE_URL", default.llm_api_base_url),
            model_report: env_or("MODEL_REPORT", default.model_report),
            model_summary: env_or("MODEL_SUMMARY", default.model_summary),
            model_guide: env_or("MODEL_GUIDE", default.model_guide),
            template_report_doc_id: env_or("TEMPLATE_REPORT_DOC_ID", default.template_report_doc_id),
            template_guide_doc_id: env_or("TEMPLATE_GUIDE_DOC_ID", default.template_guide_doc_id),
            drive_folder_id_report: env_or("DRIVE_FOLDER_ID_REPORT", default.drive_folder_id_report),
            drive_folder_id_guide: env_or("DRIVE_FOLDER_ID_GUIDE", default.drive_folder_id_guide),
            google_access_token: env_or("GOOGLE_ACCESS_TOKEN", default.google_access_token),
            sheets_id: env_or("SHEETS_ID", default.sheets_id),
            sheets_tab: env_or("SHEETS_TAB", default.sheets_tab),
            gas_webapp_url: env_or("GAS_WEBAPP_URL", default.gas_webapp_url),
            gas_token: env_or("GAS_TOKEN", default.gas_token),
            auto_gas_format: env_parse("AUTO_GAS_FORMAT", default.auto_gas_format, "bool")?,
            access_code: env_or("ACCESS_CODE", default.access_code),
            submissions_folder: env_or("SUBMISSIONS_FOLDER", default.submissions_folder),
            output_log_file: env_or("OUTPUT_LOG_FILE", default.output_log_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", default.verbose_logging, "bool")?,
            rate_limit_max: env_parse("RATE_LIMIT_MAX", default.rate_limit_max, "usize")?,
            rate_limit_window_secs: env_parse(
                "RATE_LIMIT_WINDOW_SECS",
                default.rate_limit_window_secs,
                "u64",
            )?,
            max_retries: env_parse("MAX_RETRIES", default.max_retries, "u32")?,
            guidance_max_bytes: env_parse("GUIDANCE_MAX_BYTES", default.guidance_max_bytes, "usize")?,
        })
    }

    /// 실행 전에 필수 값 확인
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("GEMINI_API_KEY", &self.llm_api_key),
            ("TEMPLATE_REPORT_DOC_ID", &self.template_report_doc_id),
            ("TEMPLATE_GUIDE_DOC_ID", &self.template_guide_doc_id),
            ("GOOGLE_ACCESS_TOKEN", &self.google_access_token),
        ];
        for (var_name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing {
                    var_name: var_name.to_string(),
                });
            }
        }
        if self.auto_gas_format && self.gas_webapp_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                var_name: "GAS_WEBAPP_URL".to_string(),
            });
        }
        Ok(())
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

fn env_or(var_name: &str, default: String) -> String {
    std::env::var(var_name).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(
    var_name: &str,
    default: T,
    expected_type: &str,
) -> Result<T, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|_| ConfigError::Invalid {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            })
        }
        _ => Ok(default),
    }
}
