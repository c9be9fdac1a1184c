//! Localised sample text, footer prefixes and dates

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::BackgroundVariant;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "zh-Hans")]
    SimplifiedChinese,
    #[serde(rename = "zh-Hant")]
    TraditionalChinese,
}

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Japanese,
        Language::English,
        Language::Korean,
        Language::SimplifiedChinese,
        Language::TraditionalChinese,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Language::Japanese => "ja",
            Language::English => "en",
            Language::Korean => "ko",
            Language::SimplifiedChinese => "zh-Hans",
            Language::TraditionalChinese => "zh-Hant",
        }
    }

    /// Resolve a language tag, falling back to Japanese.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    /// Default poster text shown before the user types anything.
    pub fn sample_text(self) -> &'static str {
        match self {
            Language::English => {
                "Is Japan going to repeat the mistakes of militarism again?\n\n\
                 Is it going to make enemies of the Chinese people and Asian people again?\n\n\
                 Is it trying to overturn the post-war international order?"
            }
            Language::Korean => {
                "일본이 다시 군국주의의 실수를 반복하려는가\n\n\
                 다시 중국 인민과 아시아 인민을 적으로 돌리려는가\n\n\
                 전후 국제 질서를 뒤엎으려 하는가"
            }
            Language::SimplifiedChinese => {
                "日本是否要再次重蹈军国主义的错误\n\n\
                 是否要再次与中国人民和亚洲人民为敌\n\n\
                 是否要颠覆战后的国际秩序"
            }
            Language::TraditionalChinese => {
                "日本是否要再次重蹈軍國主義的錯誤\n\n\
                 是否要再次與中國人民和亞洲人民為敵\n\n\
                 是否要顛覆戰後的國際秩序"
            }
            Language::Japanese => {
                "日本は再び軍国主義の過ちを繰り返すつもりなのか\n\n\
                 再び中国人民とアジア人民を敵に回すつもりなのか\n\n\
                 戦後の国際秩序を覆そうとしているのか"
            }
        }
    }

    /// Footer prefix for a background. Only the defense background uses the
    /// defense-ministry title.
    pub fn footer_prefix(self, background: BackgroundVariant) -> &'static str {
        let defense = background == BackgroundVariant::Defense;
        match (self, defense) {
            (Language::Japanese, false) => "中国外交部報道官",
            (Language::Japanese, true) => "中国国防部報道官",
            (Language::English, false) => "Spokesperson, Ministry of Foreign Affairs of China",
            (Language::English, true) => "Spokesperson, Ministry of National Defense of China",
            (Language::Korean, false) => "중국 외교부 대변인",
            (Language::Korean, true) => "중국 국방부 대변인",
            (Language::SimplifiedChinese, false) => "中国外交部发言人",
            (Language::SimplifiedChinese, true) => "中国国防部发言人",
            (Language::TraditionalChinese, false) => "中國外交部發言人",
            (Language::TraditionalChinese, true) => "中國國防部發言人",
        }
    }

    pub fn format_date(self, date: NaiveDate) -> String {
        let (y, m, d) = (date.year(), date.month(), date.day());
        match self {
            Language::English => format!("{} {}, {}", MONTHS[date.month0() as usize], d, y),
            Language::Korean => format!("{}년 {}월 {}일", y, m, d),
            _ => format!("{}年{}月{}日", y, m, d),
        }
    }

    /// Footer caption: prefix and date separated by a space.
    pub fn footer_text(self, background: BackgroundVariant, date: NaiveDate) -> String {
        format!("{} {}", self.footer_prefix(background), self.format_date(date))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Language::ALL
            .into_iter()
            .find(|l| l.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::ConfigError(format!("unsupported language {:?}", s)))
    }
}
