// ==========================================
// 赛事数据导入 - 组别类型分类器
// ==========================================
// 规则:
// - 取组别代码首字符为前缀
// - 按模板给定顺序扫描类型表，首个 code 等于前缀的规则生效
// - 无匹配 → 兜底类型（默认 "Other"）
// 纯函数: 类型表由调用方显式传入，不在分类器内硬编码
// 前置条件: code 非空（由 EntityResolver 保证）
// ==========================================

use crate::config::import_config::DEFAULT_DIVISION_TYPE;
use crate::domain::DivisionTypeRule;

pub struct DivisionTypeClassifier {
    default_type: String,
}

impl DivisionTypeClassifier {
    pub fn new(default_type: impl Into<String>) -> Self {
        Self {
            default_type: default_type.into(),
        }
    }

    /// 按前缀分类
    pub fn classify<'a>(&'a self, code: &str, type_table: &'a [DivisionTypeRule]) -> &'a str {
        let prefix = match code.chars().next() {
            Some(c) => c,
            None => return self.default_type.as_str(),
        };

        type_table
            .iter()
            .find(|rule| {
                let mut chars = rule.code.chars();
                chars.next() == Some(prefix) && chars.next().is_none()
            })
            .map(|rule| rule.name.as_str())
            .unwrap_or(self.default_type.as_str())
    }

    /// 组别展示名: 类型 + " " + 去掉首字符的代码
    ///
    /// # 示例
    /// - ("Kids", "K1") → "Kids 1"
    /// - ("Kids", "K")  → "Kids"
    pub fn division_name(division_type: &str, code: &str) -> String {
        let rest: String = code.chars().skip(1).collect();
        format!("{} {}", division_type, rest).trim_end().to_string()
    }
}

impl Default for DivisionTypeClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DIVISION_TYPE)
    }
}
