//! Static content catalog: the aptitude topics with their question
//! banks, and the coding topic slugs the practice endpoint accepts.
//! This module is the only place topic names, slugs and numeric codes
//! are defined.

/// Aptitude quiz topic. `ALL` order is the canonical catalog order and
/// doubles as the tie-break order for recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Percentages,
    TimeAndWork,
    ProfitAndLoss,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Percentages, Topic::TimeAndWork, Topic::ProfitAndLoss];

    /// Display name, as stored in attempt records.
    pub fn title(&self) -> &'static str {
        match self {
            Topic::Percentages => "Percentages",
            Topic::TimeAndWork => "Time and Work",
            Topic::ProfitAndLoss => "Profit and Loss",
        }
    }

    /// URL path segment for the quiz routes.
    pub fn slug(&self) -> &'static str {
        match self {
            Topic::Percentages => "percentages",
            Topic::TimeAndWork => "time-and-work",
            Topic::ProfitAndLoss => "profit-and-loss",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.slug() == slug)
    }

    pub fn from_title(title: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.title() == title)
    }

    /// Stable numeric feature for the predictor. Codes start at 1; 0 is
    /// reserved for unknown topics.
    pub fn code(&self) -> i32 {
        match self {
            Topic::Percentages => 1,
            Topic::TimeAndWork => 2,
            Topic::ProfitAndLoss => 3,
        }
    }
}

/// Numeric code for a stored topic title; 0 when the title is not in
/// the catalog.
pub fn topic_code(title: &str) -> i32 {
    Topic::from_title(title).map(|t| t.code()).unwrap_or(0)
}

/// One multiple-choice question. Exactly four options; `answer` is the
/// full option text, not an index.
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub text: &'static str,
    pub options: [&'static str; 4],
    pub answer: &'static str,
}

/// Ordered question bank for a topic. May be empty while content is
/// still being written; the quiz rejects such topics up front.
pub fn questions_for(topic: Topic) -> &'static [Question] {
    match topic {
        Topic::Percentages => PERCENTAGES,
        Topic::TimeAndWork => TIME_AND_WORK,
        Topic::ProfitAndLoss => &[],
    }
}

const PERCENTAGES: &[Question] = &[
    Question {
        text: "What is 25% of 200?",
        options: ["25", "50", "75", "100"],
        answer: "50",
    },
    Question {
        text: "A value increases from 80 to 100. What is the percentage increase?",
        options: ["20%", "25%", "30%", "40%"],
        answer: "25%",
    },
    Question {
        text: "What is 40% of 150?",
        options: ["50", "60", "70", "80"],
        answer: "60",
    },
    Question {
        text: "If 30% of a number is 90, what is the number?",
        options: ["270", "300", "280", "250"],
        answer: "300",
    },
    Question {
        text: "A man's salary is increased by 20% and then decreased by 20%. What is the net change?",
        options: ["4% decrease", "4% increase", "No change", "2% decrease"],
        answer: "4% decrease",
    },
    Question {
        text: "A number is first increased by 10% and then increased again by 20%. What is the overall percentage increase?",
        options: ["30%", "32%", "28%", "25%"],
        answer: "32%",
    },
    Question {
        text: "If 60 is 75% of a number, what is the number?",
        options: ["70", "75", "80", "85"],
        answer: "80",
    },
    Question {
        text: "What percentage of 1 hour is 45 minutes?",
        options: ["50%", "60%", "75%", "90%"],
        answer: "75%",
    },
    Question {
        text: "If a shirt is marked at ₹1200 and a discount of 25% is offered, what is the selling price?",
        options: ["₹800", "₹900", "₹1000", "₹950"],
        answer: "₹900",
    },
    Question {
        text: "A population increases from 20,000 to 25,000. What is the percentage increase?",
        options: ["20%", "25%", "30%", "15%"],
        answer: "25%",
    },
];

const TIME_AND_WORK: &[Question] = &[Question {
    text: "If A can do a work in 10 days, how much work does A do in 1 day?",
    options: ["1/10", "10", "1/5", "None"],
    answer: "1/10",
}];

/// Coding topic slugs the practice endpoint serves problems for.
pub const CODING_TOPICS: &[&str] = &[
    "array",
    "string",
    "hash-table",
    "math",
    "dynamic-programming",
    "sorting",
    "greedy",
    "depth-first-search",
    "breadth-first-search",
    "tree",
    "binary-search",
    "linked-list",
    "stack",
    "queue",
    "heap",
    "graph",
    "two-pointers",
    "divide-and-conquer",
    "sliding-window",
    "design",
    "topological-sort",
    "matrix",
    "trie",
    "quickselect",
    "backtracking",
    "bit-manipulation",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for topic in Topic::ALL {
            assert_eq!(Topic::from_slug(topic.slug()), Some(topic));
            assert_eq!(Topic::from_title(topic.title()), Some(topic));
        }
        assert_eq!(Topic::from_slug("linear-algebra"), None);
    }

    #[test]
    fn codes_are_stable_and_unknown_is_zero() {
        assert_eq!(topic_code("Percentages"), 1);
        assert_eq!(topic_code("Time and Work"), 2);
        assert_eq!(topic_code("Profit and Loss"), 3);
        assert_eq!(topic_code("Calculus"), 0);
    }

    #[test]
    fn every_answer_is_one_of_its_options() {
        for topic in Topic::ALL {
            for q in questions_for(topic) {
                assert!(
                    q.options.contains(&q.answer),
                    "answer missing from options: {}",
                    q.text
                );
            }
        }
    }
}
