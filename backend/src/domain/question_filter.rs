//! Search and filter criteria for listing questions.
//!
//! Every criterion is optional and they combine with AND. Matching runs in
//! the domain over the user's list so both storage adapters agree on
//! case-folding and staleness.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use super::{Difficulty, Question};

/// Days without revision after which a question counts as stale.
pub const DEFAULT_STALE_DAYS: u32 = 7;

/// Revision-state criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevisionStatus {
    #[default]
    All,
    Revised,
    NotRevised,
    /// Never revised, or last revised more than `stale_days` ago.
    Stale,
}

/// Error returned when parsing an unknown status keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRevisionStatusError {
    pub input: String,
}

impl fmt::Display for ParseRevisionStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status must be one of all, revised, not_revised, stale (got {:?})",
            self.input
        )
    }
}

impl std::error::Error for ParseRevisionStatusError {}

impl std::str::FromStr for RevisionStatus {
    type Err = ParseRevisionStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "revised" => Ok(Self::Revised),
            "not_revised" => Ok(Self::NotRevised),
            "stale" => Ok(Self::Stale),
            _ => Err(ParseRevisionStatusError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Criteria for [`crate::domain::ports::QuestionQuery::list_questions`].
///
/// # Examples
/// ```
/// use revision_tracker::domain::{QuestionFilter, RevisionStatus};
///
/// let filter = QuestionFilter::default()
///     .with_search("  sum ")
///     .with_status(RevisionStatus::Stale);
/// assert_eq!(filter.search(), Some("sum"));
/// assert_eq!(filter.stale_days(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFilter {
    search: Option<String>,
    topic: Option<String>,
    difficulty: Option<Difficulty>,
    status: RevisionStatus,
    stale_days: u32,
}

impl Default for QuestionFilter {
    fn default() -> Self {
        Self {
            search: None,
            topic: None,
            difficulty: None,
            status: RevisionStatus::All,
            stale_days: DEFAULT_STALE_DAYS,
        }
    }
}

fn folded(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

impl QuestionFilter {
    /// Case-insensitive substring match on the question name. Blank input
    /// clears the criterion.
    pub fn with_search(mut self, search: impl AsRef<str>) -> Self {
        self.search = folded(search.as_ref());
        self
    }

    /// Case-insensitive match on the trimmed topic string.
    pub fn with_topic(mut self, topic: impl AsRef<str>) -> Self {
        self.topic = folded(topic.as_ref());
        self
    }

    /// Keep only this difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Keep only this revision status.
    pub fn with_status(mut self, status: RevisionStatus) -> Self {
        self.status = status;
        self
    }

    /// Staleness threshold in days.
    pub fn with_stale_days(mut self, days: u32) -> Self {
        self.stale_days = days;
        self
    }

    /// Folded name fragment, if any.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Folded topic to match, if any.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Required difficulty, if any.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Required revision status.
    pub fn status(&self) -> RevisionStatus {
        self.status
    }

    /// Days after which a revision is stale.
    pub fn stale_days(&self) -> u32 {
        self.stale_days
    }

    /// Whether `question` satisfies every criterion at instant `now`.
    pub fn matches(&self, question: &Question, now: DateTime<Utc>) -> bool {
        if let Some(search) = &self.search
            && !question.name.as_ref().to_lowercase().contains(search.as_str())
        {
            return false;
        }
        if let Some(topic) = &self.topic
            && question.topic.as_ref().trim().to_lowercase() != *topic
        {
            return false;
        }
        if self.difficulty.is_some_and(|d| d != question.difficulty) {
            return false;
        }

        match self.status {
            RevisionStatus::All => true,
            RevisionStatus::Revised => question.is_revised,
            RevisionStatus::NotRevised => !question.is_revised,
            RevisionStatus::Stale => match question.last_revised_date {
                None => true,
                Some(date) => now - date > Duration::days(i64::from(self.stale_days)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{NewQuestion, QuestionId, QuestionName, TopicName, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-10T09:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn question(
        name: &str,
        topic: &str,
        difficulty: Difficulty,
        revised_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Question {
        let draft = NewQuestion::new(
            QuestionName::new(name).expect("name"),
            TopicName::new(topic).expect("topic"),
            difficulty,
        )
        .with_revision(revised_at.is_some(), revised_at);
        Question::create(QuestionId::random(), UserId::random(), draft, now)
    }

    #[rstest]
    fn default_filter_matches_everything(now: DateTime<Utc>) {
        let q = question("Two Sum", "Arrays", Difficulty::Easy, None, now);
        assert!(QuestionFilter::default().matches(&q, now));
    }

    #[rstest]
    #[case::lowercase("two", true)]
    #[case::uppercase("SUM", true)]
    #[case::miss("three", false)]
    #[case::blank("   ", true)]
    fn search_is_case_insensitive(now: DateTime<Utc>, #[case] term: &str, #[case] expected: bool) {
        let q = question("Two Sum", "Arrays", Difficulty::Easy, None, now);
        assert_eq!(QuestionFilter::default().with_search(term).matches(&q, now), expected);
    }

    #[rstest]
    #[case::exact("Arrays", true)]
    #[case::case_and_space("  arrays ", true)]
    #[case::prefix("Array", false)]
    fn topic_matches_whole_name(now: DateTime<Utc>, #[case] topic: &str, #[case] expected: bool) {
        let q = question("Two Sum", "Arrays", Difficulty::Easy, None, now);
        assert_eq!(QuestionFilter::default().with_topic(topic).matches(&q, now), expected);
    }

    #[rstest]
    #[case::never_revised(None, true)]
    #[case::recent(Some(Duration::days(2)), false)]
    #[case::exactly_seven_days(Some(Duration::days(7)), false)]
    #[case::old(Some(Duration::days(8)), true)]
    fn stale_status(
        now: DateTime<Utc>,
        #[case] age: Option<Duration>,
        #[case] expected: bool,
    ) {
        let q = question("Two Sum", "Arrays", Difficulty::Easy, age.map(|a| now - a), now);
        let filter = QuestionFilter::default().with_status(RevisionStatus::Stale);
        assert_eq!(filter.matches(&q, now), expected);
    }

    #[rstest]
    fn criteria_combine(now: DateTime<Utc>) {
        let filter = QuestionFilter::default()
            .with_topic("graphs")
            .with_difficulty(Difficulty::Hard)
            .with_status(RevisionStatus::NotRevised);

        let hit = question("Dijkstra", "Graphs", Difficulty::Hard, None, now);
        let wrong_difficulty = question("BFS", "Graphs", Difficulty::Easy, None, now);
        let revised = question("Prim", "Graphs", Difficulty::Hard, Some(now), now);

        assert!(filter.matches(&hit, now));
        assert!(!filter.matches(&wrong_difficulty, now));
        assert!(!filter.matches(&revised, now));
    }

    #[rstest]
    #[case("all", RevisionStatus::All)]
    #[case("revised", RevisionStatus::Revised)]
    #[case("not_revised", RevisionStatus::NotRevised)]
    #[case("stale", RevisionStatus::Stale)]
    fn parses_status_keywords(#[case] raw: &str, #[case] expected: RevisionStatus) {
        assert_eq!(raw.parse::<RevisionStatus>(), Ok(expected));
    }
}
