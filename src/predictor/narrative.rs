//! Template-based explanation sentences
//!
//! Sentences are a pure function of their inputs, so identical requests
//! always render byte-identical text. Unit words are singular only when the
//! value is exactly 1 (so "0 months", "1 month", "2 months").

use crate::config::NarrativeSettings;

/// `""` for exactly one, `"s"` otherwise.
fn plural_suffix(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// "1 year", "0 years", "3 games", ...
pub fn count_with_unit(n: i64, unit: &str) -> String {
    format!("{n} {unit}{}", plural_suffix(n))
}

fn years_and_months(years: i64, months: i64) -> String {
    format!(
        "{} and {}",
        count_with_unit(years, "year"),
        count_with_unit(months, "month")
    )
}

/// Sentence for a publisher with no history. Always plain text.
pub fn no_history_sentence(
    settings: &NarrativeSettings,
    publisher: &str,
    years_whole: i64,
    months_whole: u32,
) -> String {
    format!(
        "Based on the publisher '{publisher}', which has no historical data in our {} dataset, \
         we cannot make a reliable prediction. Industry average suggests approximately {}.",
        settings.dataset_label,
        years_and_months(years_whole, i64::from(months_whole)),
    )
}

/// Inputs for the model-backed sentence.
#[derive(Debug, Clone)]
pub struct ModelNarrative<'a> {
    pub publisher: &'a str,
    pub game_name: &'a str,
    pub sample_count: u32,
    /// Publisher historical average as (years, 30-day months)
    pub average_wait: Option<(i64, i64)>,
    pub avg_critic_score: Option<f64>,
    pub critic_score: Option<f64>,
    /// Critic score as written by the caller; preferred over `critic_score`
    pub critic_score_text: Option<&'a str>,
    pub years_whole: i64,
    pub months_whole: u32,
    pub lower_bound_years: f64,
    pub upper_bound_years: f64,
}

/// Sentence for a publisher with history, explaining the model estimate.
pub fn model_sentence(settings: &NarrativeSettings, n: &ModelNarrative<'_>) -> String {
    let em = if settings.emphasis { "**" } else { "" };
    let storefront = &settings.storefront;

    let wait = match n.average_wait {
        Some((years, months)) => {
            format!("with an average wait time of {}", years_and_months(years, months))
        }
        None => "with an unrecorded average wait time".to_string(),
    };

    let average_score = match n.avg_critic_score {
        Some(score) => format!("averaging a Metacritic score of {score:.1}"),
        None => "no Metacritic average on record".to_string(),
    };

    let game_score = match (n.critic_score_text, n.critic_score) {
        (Some(text), Some(_)) => format!("with a Metacritic score of {text}"),
        (None, Some(score)) => format!("with a Metacritic score of {score}"),
        (_, None) => "without an available Metacritic score".to_string(),
    };

    format!(
        "Based on the publisher '{publisher}', which has released {games} on {storefront} \
         {wait} ({average_score}), and considering '{game}' {game_score}, \
         the model estimates it will appear free on {storefront} approximately \
         {em}{estimate}{em} after release, with a confidence interval between \
         {em}{lower:.1} and {upper:.1} years{em}.",
        publisher = n.publisher,
        games = count_with_unit(i64::from(n.sample_count), "game"),
        game = n.game_name,
        estimate = years_and_months(n.years_whole, i64::from(n.months_whole)),
        lower = n.lower_bound_years,
        upper = n.upper_bound_years,
    )
}
