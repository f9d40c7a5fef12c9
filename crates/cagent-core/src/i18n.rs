//! Interface languages and their translation tables
//!
//! Every caption a front end draws comes from here. Tables are exhaustive
//! `match` expressions, so adding a key without translating it for every
//! language is a compile error rather than a half-translated screen.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The active interface locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh-cn")]
    ZhCn,
    #[serde(rename = "en")]
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::ZhCn, Language::En];

    pub fn code(&self) -> &'static str {
        match self {
            Language::ZhCn => "zh-cn",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "zh-cn" => Some(Language::ZhCn),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// The other language, used by the header toggle
    pub fn toggled(&self) -> Self {
        match self {
            Language::ZhCn => Language::En,
            Language::En => Language::ZhCn,
        }
    }

    /// Caption shown on the language toggle button
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::ZhCn => "中文",
            Language::En => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Keys of the statically labelled elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelKey {
    NavChat,
    NavHelp,
    NavSimilarity,
    NavHistory,
    NavSettings,
    ChatTitle,
    ChatSubtitle,
    WelcomeMessage,
    HelpTitle,
    HelpSubtitle,
    HelpPlaceholder,
    SimilarityTitle,
    SimilaritySubtitle,
    UploadFile1,
    UploadFile2,
    AnalyzeBtn,
    CodePreviewTitle,
    TogglePreview,
    File1Preview,
    File2Preview,
    HistoryTitle,
    Refresh,
    Loading,
    SettingsTitle,
    LanguageSetting,
    ThemeSetting,
    Processing,
}

impl LabelKey {
    pub const ALL: [LabelKey; 27] = [
        LabelKey::NavChat,
        LabelKey::NavHelp,
        LabelKey::NavSimilarity,
        LabelKey::NavHistory,
        LabelKey::NavSettings,
        LabelKey::ChatTitle,
        LabelKey::ChatSubtitle,
        LabelKey::WelcomeMessage,
        LabelKey::HelpTitle,
        LabelKey::HelpSubtitle,
        LabelKey::HelpPlaceholder,
        LabelKey::SimilarityTitle,
        LabelKey::SimilaritySubtitle,
        LabelKey::UploadFile1,
        LabelKey::UploadFile2,
        LabelKey::AnalyzeBtn,
        LabelKey::CodePreviewTitle,
        LabelKey::TogglePreview,
        LabelKey::File1Preview,
        LabelKey::File2Preview,
        LabelKey::HistoryTitle,
        LabelKey::Refresh,
        LabelKey::Loading,
        LabelKey::SettingsTitle,
        LabelKey::LanguageSetting,
        LabelKey::ThemeSetting,
        LabelKey::Processing,
    ];
}

pub fn label(language: Language, key: LabelKey) -> &'static str {
    match language {
        Language::ZhCn => match key {
            LabelKey::NavChat => "聊天",
            LabelKey::NavHelp => "帮助",
            LabelKey::NavSimilarity => "查重",
            LabelKey::NavHistory => "历史",
            LabelKey::NavSettings => "设置",
            LabelKey::ChatTitle => "与AI助手聊天",
            LabelKey::ChatSubtitle => "Lynn是一个智能的程序编程助手，擅长解答各种编程问题",
            LabelKey::WelcomeMessage => "你好！我是Lynn，你的编程助手。有什么我可以帮助你的吗？",
            LabelKey::HelpTitle => "C语言帮助",
            LabelKey::HelpSubtitle => "查询C语言关键字、语法和头文件说明",
            LabelKey::HelpPlaceholder => "请输入要查询的内容",
            LabelKey::SimilarityTitle => "代码查重",
            LabelKey::SimilaritySubtitle => "上传两个C语言文件，检测代码相似度",
            LabelKey::UploadFile1 => "选择第一个文件",
            LabelKey::UploadFile2 => "选择第二个文件",
            LabelKey::AnalyzeBtn => "分析相似度",
            LabelKey::CodePreviewTitle => "代码预览",
            LabelKey::TogglePreview => "隐藏预览",
            LabelKey::File1Preview => "文件1",
            LabelKey::File2Preview => "文件2",
            LabelKey::HistoryTitle => "操作历史",
            LabelKey::Refresh => "刷新",
            LabelKey::Loading => "加载中...",
            LabelKey::SettingsTitle => "设置",
            LabelKey::LanguageSetting => "界面语言",
            LabelKey::ThemeSetting => "主题",
            LabelKey::Processing => "处理中...",
        },
        Language::En => match key {
            LabelKey::NavChat => "Chat",
            LabelKey::NavHelp => "Help",
            LabelKey::NavSimilarity => "Similarity",
            LabelKey::NavHistory => "History",
            LabelKey::NavSettings => "Settings",
            LabelKey::ChatTitle => "Chat with AI Assistant",
            LabelKey::ChatSubtitle => {
                "Lynn is an intelligent programming assistant, good at answering various programming questions"
            }
            LabelKey::WelcomeMessage => "Hello! I am Lynn, your programming assistant. How can I help you?",
            LabelKey::HelpTitle => "C Language Help",
            LabelKey::HelpSubtitle => "Query C language keywords, syntax and header file descriptions",
            LabelKey::HelpPlaceholder => "Please enter content to search",
            LabelKey::SimilarityTitle => "Code Similarity Detection",
            LabelKey::SimilaritySubtitle => "Upload two C language files to detect code similarity",
            LabelKey::UploadFile1 => "Select First File",
            LabelKey::UploadFile2 => "Select Second File",
            LabelKey::AnalyzeBtn => "Analyze Similarity",
            LabelKey::CodePreviewTitle => "Code Preview",
            LabelKey::TogglePreview => "Hide Preview",
            LabelKey::File1Preview => "File 1",
            LabelKey::File2Preview => "File 2",
            LabelKey::HistoryTitle => "Operation History",
            LabelKey::Refresh => "Refresh",
            LabelKey::Loading => "Loading...",
            LabelKey::SettingsTitle => "Settings",
            LabelKey::LanguageSetting => "Interface Language",
            LabelKey::ThemeSetting => "Theme",
            LabelKey::Processing => "Processing...",
        },
    }
}

/// Input fields carrying placeholder text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Chat,
    Help,
}

pub fn placeholder(language: Language, field: InputField) -> &'static str {
    match (language, field) {
        (Language::ZhCn, InputField::Chat) => "输入你的问题...",
        (Language::ZhCn, InputField::Help) => "输入关键字、语句或头文件名...",
        (Language::En, InputField::Chat) => "Type your question...",
        (Language::En, InputField::Help) => "Enter keywords, statements or header file names...",
    }
}

/// Caption of the preview toggle for the given preview visibility
pub fn preview_toggle_caption(language: Language, preview_visible: bool) -> &'static str {
    match (language, preview_visible) {
        (Language::ZhCn, true) => "隐藏预览",
        (Language::ZhCn, false) => "显示预览",
        (Language::En, true) => "Hide Preview",
        (Language::En, false) => "Show Preview",
    }
}

/// Dynamic texts: notifications, placeholders and result captions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    ChatUnavailable,
    SendFailed,
    EmptyQuery,
    NoResults,
    SearchFailed,
    FileReadFailed,
    SelectTwoFiles,
    AnalysisFailed,
    AnalysisFailedRetry,
    SimilarityCaption,
    FileSelected,
    HistoryEmpty,
    HistoryLoadFailed,
    HistoryFailedRetry,
    LanguageChanged,
    LanguageChangeFailed,
    UnexpectedError,
    Thinking,
}

pub fn message(language: Language, msg: Message) -> &'static str {
    match language {
        Language::ZhCn => match msg {
            Message::ChatUnavailable => "聊天服务暂时不可用",
            Message::SendFailed => "发送消息失败，请检查网络连接",
            Message::EmptyQuery => "请输入要查询的内容",
            Message::NoResults => "未找到相关结果",
            Message::SearchFailed => "搜索失败，请重试",
            Message::FileReadFailed => "文件读取失败，请重试",
            Message::SelectTwoFiles => "请选择两个文件",
            Message::AnalysisFailed => "分析失败",
            Message::AnalysisFailedRetry => "分析失败，请重试",
            Message::SimilarityCaption => "相似度",
            Message::FileSelected => "已选择",
            Message::HistoryEmpty => "暂无历史记录",
            Message::HistoryLoadFailed => "加载历史记录失败",
            Message::HistoryFailedRetry => "加载失败，请重试",
            Message::LanguageChanged => "语言已切换",
            Message::LanguageChangeFailed => "切换语言失败",
            Message::UnexpectedError => "出现了一个错误，请重试",
            Message::Thinking => "思考中",
        },
        Language::En => match msg {
            Message::ChatUnavailable => "Chat service is temporarily unavailable",
            Message::SendFailed => "Failed to send message, please check your network connection",
            Message::EmptyQuery => "Please enter content to search",
            Message::NoResults => "No results found",
            Message::SearchFailed => "Search failed, please try again",
            Message::FileReadFailed => "Failed to read file, please try again",
            Message::SelectTwoFiles => "Please select two files",
            Message::AnalysisFailed => "Analysis failed",
            Message::AnalysisFailedRetry => "Analysis failed, please try again",
            Message::SimilarityCaption => "Similarity",
            Message::FileSelected => "Selected",
            Message::HistoryEmpty => "No history yet",
            Message::HistoryLoadFailed => "Failed to load history",
            Message::HistoryFailedRetry => "Loading failed, please try again",
            Message::LanguageChanged => "Language switched",
            Message::LanguageChangeFailed => "Failed to switch language",
            Message::UnexpectedError => "Something went wrong, please try again",
            Message::Thinking => "Thinking",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("EN"), Some(Language::En));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_toggle_is_an_involution() {
        for lang in Language::ALL {
            assert_ne!(lang.toggled(), lang);
            assert_eq!(lang.toggled().toggled(), lang);
        }
    }

    #[test]
    fn test_every_label_is_translated() {
        for lang in Language::ALL {
            for key in LabelKey::ALL {
                assert!(!label(lang, key).is_empty(), "{:?} missing for {}", key, lang);
            }
        }
    }

    #[test]
    fn test_tables_differ_between_languages() {
        for key in LabelKey::ALL {
            assert_ne!(label(Language::ZhCn, key), label(Language::En, key), "{:?}", key);
        }
    }

    #[test]
    fn test_language_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::ZhCn).unwrap(), "\"zh-cn\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::En);
    }

    #[test]
    fn test_preview_caption_follows_visibility() {
        assert_eq!(preview_toggle_caption(Language::En, true), "Hide Preview");
        assert_eq!(preview_toggle_caption(Language::En, false), "Show Preview");
        assert_eq!(preview_toggle_caption(Language::ZhCn, false), "显示预览");
    }
}
