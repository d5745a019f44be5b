use std::str::FromStr;

use crate::{WeatherError, model::WeatherPayload};

/// A named value a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    City,
    Country,
    DayTemp,
    NightTemp,
    AveWind,
    Txt,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::City => "city",
            Slot::Country => "country",
            Slot::DayTemp => "daytemp",
            Slot::NightTemp => "nighttemp",
            Slot::AveWind => "avewind",
            Slot::Txt => "txt",
        }
    }

    pub const fn all() -> &'static [Slot] {
        &[Slot::City, Slot::Country, Slot::DayTemp, Slot::NightTemp, Slot::AveWind, Slot::Txt]
    }
}

impl TryFrom<&str> for Slot {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Slot::all().iter().copied().find(|s| s.as_str() == value).ok_or_else(|| {
            let known: Vec<&str> = Slot::all().iter().map(Slot::as_str).collect();
            WeatherError::InvalidTemplate(format!(
                "unknown slot '{{{value}}}', expected one of: {}",
                known.join(", ")
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Slot(Slot),
}

/// A validated report template such as `"{city}, {country} -> Day: {daytemp}"`.
///
/// `{{` and `}}` produce literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    pieces: Vec<Piece>,
}

impl FormatTemplate {
    pub fn parse(template: &str) -> Result<Self, WeatherError> {
        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') | None => {
                                return Err(WeatherError::InvalidTemplate(format!(
                                    "unclosed '{{' in \"{template}\""
                                )));
                            }
                            Some(ch) => name.push(ch),
                        }
                    }
                    if !text.is_empty() {
                        pieces.push(Piece::Text(std::mem::take(&mut text)));
                    }
                    pieces.push(Piece::Slot(Slot::try_from(name.trim())?));
                }
                '}' => {
                    return Err(WeatherError::InvalidTemplate(format!(
                        "single '}}' in \"{template}\""
                    )));
                }
                _ => text.push(c),
            }
        }

        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }

        Ok(Self { pieces })
    }

    pub fn render(&self, fields: &ReportFields) -> String {
        self.pieces.iter().fold(String::new(), |mut out, piece| {
            match piece {
                Piece::Text(t) => out.push_str(t),
                Piece::Slot(slot) => out.push_str(fields.get(*slot)),
            }
            out
        })
    }
}

impl FromStr for FormatTemplate {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Display values for one forecast day, exactly as the provider sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFields {
    pub city: String,
    pub country: String,
    pub daytemp: String,
    pub nighttemp: String,
    pub avewind: String,
    pub txt: String,
}

impl ReportFields {
    /// Pull the fields for `day_offset` (0 = today) out of `payload`.
    pub fn from_payload(payload: &WeatherPayload, day_offset: i64) -> Result<Self, WeatherError> {
        let days = payload.days();
        let out_of_range = || WeatherError::OutOfRange {
            offset: day_offset,
            available: days.len().saturating_sub(1),
        };

        let slot = day_offset
            .checked_add(1)
            .and_then(|s| usize::try_from(s).ok())
            .ok_or_else(out_of_range)?;
        let day = days.get(slot).ok_or_else(out_of_range)?;
        let txt = slot
            .checked_mul(2)
            .and_then(|i| payload.narrative().get(i))
            .ok_or_else(out_of_range)?;

        Ok(Self {
            city: payload.city().to_string(),
            country: payload.region().to_string(),
            daytemp: day.high.celsius.to_string(),
            nighttemp: day.low.celsius.to_string(),
            avewind: day.avewind.kph.to_string(),
            txt: txt.fcttext_metric.clone(),
        })
    }

    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::City => &self.city,
            Slot::Country => &self.country,
            Slot::DayTemp => &self.daytemp,
            Slot::NightTemp => &self.nighttemp,
            Slot::AveWind => &self.avewind,
            Slot::Txt => &self.txt,
        }
    }
}

/// Render the forecast for `day_offset` into `template`.
pub fn extract(
    payload: &WeatherPayload,
    day_offset: i64,
    template: &FormatTemplate,
) -> Result<String, WeatherError> {
    let fields = ReportFields::from_payload(payload, day_offset)?;
    Ok(template.render(&fields))
}
