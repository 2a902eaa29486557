use log::info;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

pub const INITIAL_GREETING: &str =
    "مرحباً بك في BoAI! 👋 أنا مساعدك الذكي للتعلم والبرمجة. يمكنني مساعدتك في البرمجة، الرياضيات، العلوم، والتعلم الذاتي. كيف يمكنني مساعدتك اليوم؟";

pub const RESET_GREETING: &str =
    "مرحباً بك في BoAI! 👋 أنا مساعدك الذكي للتعلم والبرمجة. كيف يمكنني مساعدتك اليوم؟";

pub const FALLBACK_REPLY: &str =
    "شكراً لرسالتك! أنا هنا لمساعدتك في التعلم والبرمجة. هل يمكنك توضيح سؤالك أكثر أو اختيار أحد المواضيع التالية: البرمجة، الرياضيات، العلوم، أو التعلم الذاتي؟";

pub const APOLOGY_REPLY: &str = "عذراً، حدث خطأ في المعالجة. يرجى المحاولة مرة أخرى.";

#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("Response rule table is empty")]
    RuleTableEmpty,
    #[error("Response rule {0} has an empty keyword")]
    EmptyKeyword(usize),
    #[error("Responses file IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Responses JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Deserialize, Debug, Clone)]
pub struct KeywordRule {
    pub keyword: String,
    pub reply: String,
}

/// Keyword table plus the fixed replies around it. Rule order is the
/// canonical ordering: the first matching keyword wins.
#[derive(Deserialize, Debug, Clone)]
pub struct ResponseConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_reset_greeting")]
    pub reset_greeting: String,
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
    #[serde(default = "default_apology_reply")]
    pub apology_reply: String,
    pub rules: Vec<KeywordRule>,
    #[serde(skip)]
    pub last_loaded: Option<SystemTime>,
}

fn default_greeting() -> String {
    INITIAL_GREETING.to_string()
}
fn default_reset_greeting() -> String {
    RESET_GREETING.to_string()
}
fn default_fallback_reply() -> String {
    FALLBACK_REPLY.to_string()
}
fn default_apology_reply() -> String {
    APOLOGY_REPLY.to_string()
}

/// The table shipped with the assistant, in its canonical order.
static BUILTIN_RULES: Lazy<Vec<KeywordRule>> = Lazy::new(|| {
    [
        ("python", "بايثون لغة برمجة رائعة! هل تريد شرحاً عن أساسياتها أو مشروع معين؟"),
        ("دالة", "لتعريف دالة في Python استخدم `def` اسم_الدالة():"),
        ("كود", "يمكنني مساعدتك في كتابة وتصحيح الأكواد. ما المشكلة التي تواجهها؟"),
        ("تعلم", "أهلاً بك في رحلة التعلم! ما المجال الذي تريد التعلم فيه؟"),
        ("برمجة", "البرمجة مهارة رائعة! هل تبدأ بمشروع معين أو تتعلم الأساسيات؟"),
        ("html", "HTML هي لغة ترميز لإنشاء صفحات الويب. هل تحتاج مساعدة في HTML؟"),
        ("css", "CSS用于 تنسيق صفحات الويب. كيف يمكنني المساعدة؟"),
        ("javascript", "JavaScript لغة برمجة للويب. هل تريد تعلم الأساسيات أو مشروع معين؟"),
        ("react", "React مكتبة JavaScript لبناء واجهات المستخدم. هل تحتاج مساعدة؟"),
        ("مشروع", "رائع! أخبرني أكثر عن المشروع الذي تعمل عليه."),
        ("خطأ", "أخبرني بالخطأ الذي تواجهه وسأساعدك في حله."),
        ("شرح", "أي مفهوم تريد أن أشرحه لك؟"),
        ("مثال", "سأعطيك مثالاً عملياً. ما الموضوع الذي تريده؟"),
        ("شكر", "على الرحب والسعة! أنا هنا لمساعدتك دائماً."),
        ("مرحبا", "مرحباً بك! كيف يمكنني مساعدتك اليوم؟"),
    ]
        .iter()
        .map(|(keyword, reply)| KeywordRule {
            keyword: keyword.to_string(),
            reply: reply.to_string(),
        })
        .collect()
});

impl ResponseConfig {
    pub fn builtin() -> Self {
        Self {
            greeting: default_greeting(),
            reset_greeting: default_reset_greeting(),
            fallback_reply: default_fallback_reply(),
            apology_reply: default_apology_reply(),
            rules: BUILTIN_RULES.clone(),
            last_loaded: None,
        }
    }

    fn validate(&self) -> Result<(), ResponseError> {
        if self.rules.is_empty() {
            return Err(ResponseError::RuleTableEmpty);
        }
        for (idx, rule) in self.rules.iter().enumerate() {
            if rule.keyword.trim().is_empty() {
                return Err(ResponseError::EmptyKeyword(idx));
            }
        }
        Ok(())
    }

    // Keywords are matched against case-folded input, so fold them once at
    // load time.
    fn normalize(&mut self) {
        for rule in &mut self.rules {
            rule.keyword = rule.keyword.to_lowercase();
        }
    }
}

pub fn load_responses(path: &str) -> Result<Arc<ResponseConfig>, Box<dyn Error + Send + Sync>> {
    let file_content = fs
        ::read_to_string(path)
        .map_err(|e| format!("Failed to read responses file '{}': {}", path, e))?;
    let mut config: ResponseConfig = serde_json
        ::from_str(&file_content)
        .map_err(|e| format!("Failed to parse responses file '{}': {}", path, e))?;
    config.validate()?;
    config.normalize();
    config.last_loaded = Some(SystemTime::now());
    Ok(Arc::new(config))
}

/// Loads the response table from `path`, falling back to the built-in table
/// when no such file exists.
pub fn load_responses_or_builtin(
    path: &str
) -> Result<Arc<ResponseConfig>, Box<dyn Error + Send + Sync>> {
    if Path::new(path).exists() {
        load_responses(path)
    } else {
        info!("Responses file '{}' not found, using built-in table", path);
        let mut config = ResponseConfig::builtin();
        config.normalize();
        Ok(Arc::new(config))
    }
}

pub fn reload_responses_if_changed<P: AsRef<Path>>(
    path: P,
    current_config: &Arc<ResponseConfig>
) -> Result<Option<Arc<ResponseConfig>>, Box<dyn Error + Send + Sync>> {
    let metadata = match fs::metadata(&path) {
        Ok(m) => m,
        Err(_) => {
            return Ok(None);
        }
    };

    if let Ok(modified) = metadata.modified() {
        let stale = match current_config.last_loaded {
            Some(last_loaded) => modified > last_loaded,
            None => true,
        };
        if stale {
            info!("Responses file changed, reloading...");
            let path_str = path.as_ref().to_string_lossy();
            return Ok(Some(load_responses(&path_str)?));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_keeps_canonical_order() {
        let config = ResponseConfig::builtin();
        assert_eq!(config.rules.len(), 15);
        assert_eq!(config.rules[0].keyword, "python");
        assert_eq!(config.rules[14].keyword, "مرحبا");
    }

    #[test]
    fn empty_rule_table_is_rejected() {
        let config = ResponseConfig {
            rules: Vec::new(),
            ..ResponseConfig::builtin()
        };
        assert!(matches!(config.validate(), Err(ResponseError::RuleTableEmpty)));
    }

    #[test]
    fn blank_keyword_is_rejected() {
        let mut config = ResponseConfig::builtin();
        config.rules[3].keyword = "  ".to_string();
        assert!(matches!(config.validate(), Err(ResponseError::EmptyKeyword(3))));
    }

    #[test]
    fn keywords_are_case_folded_at_load() {
        let mut config = ResponseConfig::builtin();
        config.rules[0].keyword = "Python".to_string();
        config.normalize();
        assert_eq!(config.rules[0].keyword, "python");
    }
}
