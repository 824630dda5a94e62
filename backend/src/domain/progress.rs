//! Revision progress counters.
//!
//! Per-topic grouping keys on the raw topic string carried by each question,
//! so a topic with no registry record still appears and a registered topic
//! with no questions does not.

use std::collections::BTreeMap;

use serde::Serialize;

use super::Question;

/// Revised versus total question counts for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallProgress {
    pub revised_count: u64,
    pub total_count: u64,
}

/// Counts for a single topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopicStats {
    pub total: u64,
    pub revised: u64,
}

impl TopicStats {
    fn record(&mut self, is_revised: bool) {
        self.total += 1;
        if is_revised {
            self.revised += 1;
        }
    }
}

/// Count revised and total questions.
pub fn overall_progress<'a>(questions: impl IntoIterator<Item = &'a Question>) -> OverallProgress {
    questions
        .into_iter()
        .fold(OverallProgress::default(), |mut acc, question| {
            acc.total_count += 1;
            if question.is_revised {
                acc.revised_count += 1;
            }
            acc
        })
}

/// Group counts by topic string, ordered by topic.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use revision_tracker::domain::{
///     per_topic_stats, Difficulty, NewQuestion, Question, QuestionId, QuestionName,
///     TopicName, TopicStats, UserId,
/// };
///
/// let user = UserId::random();
/// let make = |topic: &str, revised: bool| {
///     let draft = NewQuestion::new(
///         QuestionName::new("q").unwrap(),
///         TopicName::new(topic).unwrap(),
///         Difficulty::Easy,
///     )
///     .with_revision(revised, None);
///     Question::create(QuestionId::random(), user, draft, Utc::now())
/// };
/// let questions = [make("Arrays", true), make("Arrays", false), make("Trees", true)];
///
/// let stats = per_topic_stats(&questions);
/// assert_eq!(stats["Arrays"], TopicStats { total: 2, revised: 1 });
/// assert_eq!(stats["Trees"], TopicStats { total: 1, revised: 1 });
/// ```
pub fn per_topic_stats<'a>(
    questions: impl IntoIterator<Item = &'a Question>,
) -> BTreeMap<String, TopicStats> {
    let mut stats: BTreeMap<String, TopicStats> = BTreeMap::new();
    for question in questions {
        stats
            .entry(question.topic.as_ref().to_owned())
            .or_default()
            .record(question.is_revised);
    }
    stats
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Difficulty, NewQuestion, QuestionId, QuestionName, TopicName, UserId};
    use chrono::Utc;
    use rstest::rstest;

    fn question(topic: &str, revised: bool) -> Question {
        let draft = NewQuestion::new(
            QuestionName::new("q").expect("name"),
            TopicName::new(topic).expect("topic"),
            Difficulty::Medium,
        )
        .with_revision(revised, None);
        Question::create(QuestionId::random(), UserId::random(), draft, Utc::now())
    }

    #[rstest]
    fn empty_input_yields_zero_counts() {
        let questions: Vec<Question> = Vec::new();
        assert_eq!(overall_progress(&questions), OverallProgress::default());
        assert!(per_topic_stats(&questions).is_empty());
    }

    #[rstest]
    fn overall_counts_revised_and_total() {
        let questions = [question("A", true), question("B", false), question("C", true)];
        assert_eq!(
            overall_progress(&questions),
            OverallProgress {
                revised_count: 2,
                total_count: 3
            }
        );
    }

    #[rstest]
    fn topics_group_by_exact_string() {
        let questions = [question("Graphs", true), question("graphs", false)];
        let stats = per_topic_stats(&questions);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats["Graphs"], TopicStats { total: 1, revised: 1 });
        assert_eq!(stats["graphs"], TopicStats { total: 1, revised: 0 });
    }
}
