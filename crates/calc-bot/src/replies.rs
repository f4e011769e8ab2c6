//! Reply texts
//!
//! Every message the bot sends is rendered from a MiniJinja template. Each
//! language carries its own set of four templates: `start`, `help`,
//! `success` and `error`.

use crate::error::Result;
use calc_core::CalcError;
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported reply languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    /// English
    #[default]
    English,
    /// Russian
    Russian,
}

impl Language {
    /// All languages with a template set
    pub const ALL: [Language; 2] = [Language::English, Language::Russian];

    /// ISO 639-1 language code
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    /// Language name for display
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Russian => "Russian",
        }
    }

    /// Parse from ISO 639-1 code or common name, falling back to English
    ///
    /// # Examples
    ///
    /// ```
    /// use calc_bot::Language;
    ///
    /// assert_eq!(Language::from_code("ru"), Language::Russian);
    /// assert_eq!(Language::from_code("English"), Language::English);
    /// assert_eq!(Language::from_code("ja"), Language::English);
    /// ```
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ru" | "russian" | "русский" | "ru-ru" => Language::Russian,
            _ => Language::English,
        }
    }

    fn templates(self) -> [(&'static str, &'static str); 4] {
        match self {
            Language::English => [
                ("start", EN_START),
                ("help", EN_HELP),
                ("success", EN_SUCCESS),
                ("error", EN_ERROR),
            ],
            Language::Russian => [
                ("start", RU_START),
                ("help", RU_HELP),
                ("success", RU_SUCCESS),
                ("error", RU_ERROR),
            ],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Language::from_code(s)
    }
}

const EN_START: &str = r"👋 Hi! I am a calculator bot.

Supported operations:
• Addition: +
• Subtraction: -
• Multiplication: * or ×
• Division: / or ÷
• Exponentiation: ^ or **
• Remainder: %

Examples:
• 2 + 3
• 10.5 * 2
• 16 / 4
• 2 ^ 3
• 10 % 3

Just send me an expression!";

const EN_HELP: &str = r"📖 How to use:

Send an expression in the form: number operation number

Valid examples:
• 15 + 25
• 100 - 50
• 12.5 * 4
• 144 / 12
• 2 ^ 10
• 17 % 5

⚠️ Limits:
• At most {{ max_length }} characters
• Simple expressions only (two numbers and one operation)
• Division by zero is not allowed";

const EN_SUCCESS: &str = "✅ Result: {{ result }}";

const EN_ERROR: &str = r"❌ Error: {{ message }}

Use /help for usage instructions.";

const RU_START: &str = r"👋 Привет! Я калькулятор-бот.

Поддерживаемые операции:
• Сложение: +
• Вычитание: -
• Умножение: * или ×
• Деление: / или ÷
• Возведение в степень: ^ или **
• Остаток от деления: %

Примеры:
• 2 + 3
• 10.5 * 2
• 16 / 4
• 2 ^ 3
• 10 % 3

Просто отправьте мне математическое выражение!";

const RU_HELP: &str = r"📖 Справка по использованию:

Отправьте математическое выражение в формате: число операция число

Примеры корректных выражений:
• 15 + 25
• 100 - 50
• 12.5 * 4
• 144 / 12
• 2 ^ 10
• 17 % 5

⚠️ Ограничения:
• Максимум {{ max_length }} символов
• Только простые выражения (два числа и одна операция)
• Деление на ноль запрещено";

const RU_SUCCESS: &str = "✅ Результат: {{ result }}";

const RU_ERROR: &str = r"❌ Ошибка: {{ message }}

Используйте /help для получения справки.";

/// Renders bot replies in one language
pub struct Replies {
    env: Environment<'static>,
    language: Language,
    max_length: usize,
}

impl Replies {
    /// Compile the template set for `language`
    pub fn new(language: Language, max_length: usize) -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in language.templates() {
            env.add_template(name, source)?;
        }

        Ok(Self {
            env,
            language,
            max_length,
        })
    }

    /// Reply language
    pub fn language(&self) -> Language {
        self.language
    }

    /// Greeting sent for `/start`
    pub fn start(&self) -> Result<String> {
        self.render("start", context! { max_length => self.max_length })
    }

    /// Usage text sent for `/help`
    pub fn help(&self) -> Result<String> {
        self.render("help", context! { max_length => self.max_length })
    }

    /// Successful calculation
    pub fn success(&self, result: &str) -> Result<String> {
        self.render("success", context! { result => result })
    }

    /// Failed calculation
    pub fn error(&self, err: &CalcError) -> Result<String> {
        let message = self.describe(err);
        self.render("error", context! { message => message })
    }

    /// Human readable description of a calculation error
    pub fn describe(&self, err: &CalcError) -> String {
        match self.language {
            Language::English => err.to_string(),
            Language::Russian => describe_ru(err),
        }
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }
}

impl fmt::Debug for Replies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replies")
            .field("language", &self.language)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

fn describe_ru(err: &CalcError) -> String {
    match err {
        CalcError::TooLong { max } => {
            format!("выражение слишком длинное (максимум {max} символов)")
        }
        CalcError::Empty => "пустое выражение".to_string(),
        CalcError::InvalidCharacters => "выражение содержит недопустимые символы".to_string(),
        CalcError::NoOperatorFound => "операция не найдена или неправильный формат".to_string(),
        CalcError::UnsupportedOperator(symbol) => format!("неподдерживаемая операция: {symbol}"),
        CalcError::DivisionByZero(calc_core::Operator::Modulo) => {
            "деление на ноль при вычислении остатка".to_string()
        }
        CalcError::DivisionByZero(_) => "деление на ноль".to_string(),
        CalcError::ResultTooLarge => "результат слишком велик".to_string(),
        CalcError::ResultNotANumber => "результат не является числом".to_string(),
    }
}
