use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Locale collaborator producing weekday labels for day buckets.
///
/// Implementations must be pure: the same date always yields the same label.
pub trait WeekdayLabels {
    fn label(&self, date: NaiveDate) -> String;
}

/// Supported display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Portuguese,
}

/// Short ("Sat") or long ("Saturday") weekday names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    Short,
    Long,
}

/// Weekday label provider backed by built-in locale tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleWeekdays {
    language: Language,
    style: LabelStyle,
}

impl LocaleWeekdays {
    pub fn new(language: Language, style: LabelStyle) -> Self {
        LocaleWeekdays { language, style }
    }

    /// Resolve a locale tag such as "en", "pt" or "pt-BR" (case-insensitive).
    /// Unknown tags fall back to English short labels.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        let language = match primary.as_str() {
            "pt" => Language::Portuguese,
            _ => Language::English,
        };
        LocaleWeekdays::new(language, LabelStyle::Short)
    }

    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Default for LocaleWeekdays {
    fn default() -> Self {
        LocaleWeekdays::new(Language::English, LabelStyle::Short)
    }
}

impl WeekdayLabels for LocaleWeekdays {
    fn label(&self, date: NaiveDate) -> String {
        weekday_name(date.weekday(), self.language, self.style).to_string()
    }
}

fn weekday_name(weekday: Weekday, language: Language, style: LabelStyle) -> &'static str {
    match (language, style) {
        (Language::English, LabelStyle::Short) => match weekday {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        },
        (Language::English, LabelStyle::Long) => match weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        },
        (Language::Portuguese, LabelStyle::Short) => match weekday {
            Weekday::Mon => "Seg",
            Weekday::Tue => "Ter",
            Weekday::Wed => "Qua",
            Weekday::Thu => "Qui",
            Weekday::Fri => "Sex",
            Weekday::Sat => "Sáb",
            Weekday::Sun => "Dom",
        },
        (Language::Portuguese, LabelStyle::Long) => match weekday {
            Weekday::Mon => "Segunda-feira",
            Weekday::Tue => "Terça-feira",
            Weekday::Wed => "Quarta-feira",
            Weekday::Thu => "Quinta-feira",
            Weekday::Fri => "Sexta-feira",
            Weekday::Sat => "Sábado",
            Weekday::Sun => "Domingo",
        },
    }
}
