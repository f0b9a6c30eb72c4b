use std::collections::HashMap;

pub struct I18n {
    translations: HashMap<String, HashMap<String, String>>,
    current_lang: String,
}

impl I18n {
    pub fn new(lang: &str) -> Self {
        let mut translations = HashMap::new();

        // English
        let mut en = HashMap::new();
        // Runner messages
        en.insert("error_missing_command".to_string(), "qdbg requires a command".to_string());
        en.insert("error_command_not_found".to_string(), "Command not found: {0}".to_string());
        en.insert("error_browser_unavailable".to_string(), "The command failed and no web browser could be opened. Search manually: {0}".to_string());
        en.insert("error_internal".to_string(), "qdbg failed: {0}".to_string());
        en.insert("search_opened".to_string(), "Command exited with code {0}, opened a search for its error".to_string());

        // Installer messages
        en.insert("install_from_file".to_string(), "Attempting to install from file: {0}".to_string());
        en.insert("install_version".to_string(), "Installing version: {0}".to_string());
        en.insert("install_downgrade".to_string(), "Replacing newer version {0} with {1}".to_string());
        en.insert("install_already_latest".to_string(), "Latest version already installed.".to_string());
        en.insert("install_already_present".to_string(), "There is a version of qdbg already installed.".to_string());
        en.insert("install_version_missing".to_string(), "Version {0} does not exist.".to_string());
        en.insert("install_no_release".to_string(), "No installable release found in {0}".to_string());
        en.insert("install_current_unknown".to_string(), "Unable to get the current qdbg version. Assuming None".to_string());
        en.insert("install_done".to_string(), "qdbg ({0}) is installed now. Great!".to_string());
        en.insert("install_path_hint".to_string(), "To get started you need qdbg's bin directory ({0}) in your PATH. To configure your current shell run: source {1}".to_string());
        en.insert("install_failed".to_string(), "An error has occurred: {0}".to_string());
        en.insert("uninstall_done".to_string(), "Removed qdbg from {0}".to_string());
        en.insert("uninstall_nothing".to_string(), "qdbg is not installed at {0}".to_string());

        // 中文
        let mut zh = HashMap::new();
        zh.insert("error_missing_command".to_string(), "qdbg 需要一个命令".to_string());
        zh.insert("error_command_not_found".to_string(), "找不到命令: {0}".to_string());
        zh.insert("error_browser_unavailable".to_string(), "命令执行失败，且无法打开浏览器。请手动搜索: {0}".to_string());
        zh.insert("error_internal".to_string(), "qdbg 运行失败: {0}".to_string());
        zh.insert("search_opened".to_string(), "命令退出码 {0}，已打开错误搜索".to_string());

        zh.insert("install_from_file".to_string(), "尝试从文件安装: {0}".to_string());
        zh.insert("install_version".to_string(), "正在安装版本: {0}".to_string());
        zh.insert("install_downgrade".to_string(), "用 {1} 替换较新的版本 {0}".to_string());
        zh.insert("install_already_latest".to_string(), "已安装最新版本。".to_string());
        zh.insert("install_already_present".to_string(), "已经安装了某个版本的 qdbg。".to_string());
        zh.insert("install_version_missing".to_string(), "版本 {0} 不存在。".to_string());
        zh.insert("install_no_release".to_string(), "在 {0} 中没有找到可安装的版本".to_string());
        zh.insert("install_current_unknown".to_string(), "无法获取当前 qdbg 版本，按未安装处理".to_string());
        zh.insert("install_done".to_string(), "qdbg ({0}) 安装完成！".to_string());
        zh.insert("install_path_hint".to_string(), "请将 qdbg 的 bin 目录 ({0}) 加入 PATH。当前 shell 可运行: source {1}".to_string());
        zh.insert("install_failed".to_string(), "发生错误: {0}".to_string());
        zh.insert("uninstall_done".to_string(), "已从 {0} 移除 qdbg".to_string());
        zh.insert("uninstall_nothing".to_string(), "{0} 中没有安装 qdbg".to_string());

        translations.insert("en".to_string(), en);
        translations.insert("zh".to_string(), zh);

        // 确定语言 - 支持多种语言代码格式
        let effective_lang = if lang.starts_with("zh") || lang == "cn" || lang == "chinese" {
            "zh"
        } else {
            "en"
        };

        Self {
            translations,
            current_lang: effective_lang.to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        if let Some(lang_map) = self.translations.get(&self.current_lang) {
            if let Some(value) = lang_map.get(key) {
                return value.clone();
            }
        }
        key.to_string()
    }

    pub fn t_format(&self, key: &str, args: &[&str]) -> String {
        let template = self.t(key);
        let mut result = template;
        for (i, arg) in args.iter().enumerate() {
            result = result.replace(&format!("{{{}}}", i), arg);
        }
        result
    }

    /// Localized, user-facing rendering of a runner or installer error.
    pub fn describe(&self, err: &crate::error::QdbgError) -> String {
        use crate::error::QdbgError;
        match err {
            QdbgError::MissingCommand => self.t("error_missing_command"),
            QdbgError::CommandNotFound { program, .. } => self.t_format("error_command_not_found", &[program.as_str()]),
            QdbgError::BrowserUnavailable { url } => self.t_format("error_browser_unavailable", &[url.as_str()]),
            other => self.t_format("error_internal", &[other.to_string().as_str()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QdbgError;

    #[test]
    fn picks_language_from_locale_prefix() {
        assert_eq!(I18n::new("zh_CN").t("install_already_latest"), "已安装最新版本。");
        assert_eq!(I18n::new("en_US").t("install_already_latest"), "Latest version already installed.");
        assert_eq!(I18n::new("fr_FR").t("install_already_latest"), "Latest version already installed.");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        assert_eq!(I18n::new("en").t("no_such_key"), "no_such_key");
    }

    #[test]
    fn placeholders_are_positional() {
        let i18n = I18n::new("en");
        assert_eq!(
            i18n.t_format("install_path_hint", &["/h/bin", "/h/env"]),
            "To get started you need qdbg's bin directory (/h/bin) in your PATH. To configure your current shell run: source /h/env"
        );
    }

    #[test]
    fn describes_runner_errors() {
        let i18n = I18n::new("en");
        assert_eq!(i18n.describe(&QdbgError::MissingCommand), "qdbg requires a command");
        assert_eq!(
            i18n.describe(&QdbgError::BrowserUnavailable { url: "https://u".into() }),
            "The command failed and no web browser could be opened. Search manually: https://u"
        );
    }
}
