//! 診断メッセージ生成モジュール

use std::collections::{
    BTreeSet,
    HashMap,
};
use std::collections::hash_map::Entry;

use super::types::{
    Diagnostic,
    Rule,
};
use crate::catalog::placeholders::{
    describe,
    placeholders,
};
use crate::catalog::{
    Catalog,
    Message,
    MessageKey,
    TranslationStatus,
};
use crate::config::LintConfig;
use crate::types::{
    SourcePosition,
    SourceRange,
};

/// 診断メッセージの収集先
struct Collector<'a> {
    /// 各ルールのレベル設定
    config: &'a LintConfig,
    /// 収集済みの診断メッセージ
    diagnostics: Vec<Diagnostic>,
}

impl Collector<'_> {
    /// ルールが有効な場合のみ診断メッセージを追加
    fn report(&mut self, rule: Rule, context: &str, message: &Message, text: String) {
        let Some(severity) = self.config.level(rule).severity() else {
            return;
        };

        self.diagnostics.push(Diagnostic {
            rule,
            severity,
            message: text,
            context: context.to_string(),
            source: message.source.clone(),
            range: SourceRange::at(message.position),
        });
    }

    /// プレースホルダーの整合性をチェック
    fn check_placeholders(&mut self, context: &str, message: &Message) {
        let expected = placeholders(&message.source);

        for text in message.translated_texts().filter(|text| !text.is_empty()) {
            let found = placeholders(text);

            let missing: BTreeSet<u32> =
                expected.difference(&found).copied().collect();
            if !missing.is_empty() {
                self.report(
                    Rule::PlaceholderMismatch,
                    context,
                    message,
                    format!("Translation '{text}' is missing {}", describe(&missing)),
                );
            }

            let extra: BTreeSet<u32> =
                found.difference(&expected).copied().collect();
            if !extra.is_empty() {
                self.report(
                    Rule::ExtraPlaceholder,
                    context,
                    message,
                    format!("Translation '{text}' uses {} not present in the source", describe(&extra)),
                );
            }
        }
    }

    /// numerus 属性と `<numerusform>` の整合性をチェック
    fn check_numerus(&mut self, context: &str, message: &Message) {
        if message.numerus && message.numerus_forms.is_empty() {
            let text = if message.translation.is_empty() {
                "Plural message has no <numerusform> entries"
            } else {
                "Plural message has a plain translation instead of <numerusform> entries"
            };
            self.report(Rule::NumerusForms, context, message, text.to_string());
        }
        if !message.numerus && !message.numerus_forms.is_empty() {
            self.report(
                Rule::NumerusForms,
                context,
                message,
                "Message is not marked numerus=\"yes\" but has <numerusform> entries".to_string(),
            );
        }
    }
}

/// カタログの診断メッセージを生成
///
/// 重複したメッセージ、プレースホルダーの不一致、空の翻訳などを検出します。
///
/// # Arguments
/// * `catalog` - チェック対象のカタログ
/// * `config` - 各ルールのレベル設定
///
/// # Returns
/// 文書順の診断メッセージのリスト
#[must_use]
pub fn lint_catalog(catalog: &Catalog, config: &LintConfig) -> Vec<Diagnostic> {
    let mut collector = Collector { config, diagnostics: Vec::new() };
    let mut seen: HashMap<MessageKey, SourcePosition> = HashMap::new();

    for (context, message) in catalog.messages() {
        match seen.entry(message.key(context)) {
            Entry::Occupied(first) => {
                let line = first.get().line + 1;
                collector.report(
                    Rule::DuplicateMessage,
                    context,
                    message,
                    format!("Duplicate of the message at line {line}"),
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(message.position);
            }
        }

        // 廃止されたメッセージは報告のみ
        if !message.status.is_active() {
            collector.report(
                Rule::Obsolete,
                context,
                message,
                format!("Message is {} and no longer used", message.status),
            );
            continue;
        }

        if message.status == TranslationStatus::Unfinished {
            collector.report(Rule::Unfinished, context, message, "Translation is unfinished".to_string());
        }

        collector.check_numerus(context, message);

        if message.is_blank() {
            if message.status == TranslationStatus::Finished {
                collector.report(
                    Rule::EmptyTranslation,
                    context,
                    message,
                    "Translation is marked finished but is empty".to_string(),
                );
            }
            continue;
        }

        collector.check_placeholders(context, message);
    }

    collector.diagnostics
}
