use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::Date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: TaskCategory,
    #[serde(with = "deadline_format")]
    pub deadline: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotCompleted,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Work,
    Study,
    Personal,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 2] = [TaskStatus::NotCompleted, TaskStatus::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotCompleted => "not_completed",
            Self::Completed => "completed",
        }
    }

    /// Position in the canonical sort: open tasks come first.
    pub fn rank(self) -> u8 {
        match self {
            Self::NotCompleted => 0,
            Self::Completed => 1,
        }
    }
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [
        TaskPriority::Low,
        TaskPriority::Normal,
        TaskPriority::High,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }

    /// Position in the canonical sort: high priority comes first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Normal => 1,
            Self::Low => 2,
        }
    }
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 3] = [
        TaskCategory::Work,
        TaskCategory::Study,
        TaskCategory::Personal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Study => "study",
            Self::Personal => "personal",
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Self::Work => 0,
            Self::Study => 1,
            Self::Personal => 2,
        }
    }
}

/// Error returned when a string is not one of an enumeration's names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub value: String,
    pub expected: &'static [&'static str],
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not one of [{}]",
            self.value,
            self.expected.join(", ")
        )
    }
}

macro_rules! enum_text {
    ($ty:ty, [$($name:literal => $variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($name => Ok($variant),)+
                    other => Err(UnknownVariant {
                        value: other.to_string(),
                        expected: &[$($name),+],
                    }),
                }
            }
        }
    };
}

enum_text!(TaskStatus, [
    "not_completed" => TaskStatus::NotCompleted,
    "completed" => TaskStatus::Completed,
]);

enum_text!(TaskPriority, [
    "low" => TaskPriority::Low,
    "normal" => TaskPriority::Normal,
    "high" => TaskPriority::High,
]);

enum_text!(TaskCategory, [
    "work" => TaskCategory::Work,
    "study" => TaskCategory::Study,
    "personal" => TaskCategory::Personal,
]);

pub mod deadline_format {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;
    use time::format_description::BorrowedFormatItem;
    use time::macros::format_description;

    pub const FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn parse(value: &str) -> Result<Date, time::error::Parse> {
        Date::parse(value, FORMAT)
    }

    pub fn render(date: Date) -> String {
        date.format(FORMAT).unwrap_or_else(|_| date.to_string())
    }

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&render(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(|err| D::Error::custom(format!("deadline '{raw}': {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskCategory, TaskPriority, TaskStatus, deadline_format};
    use time::macros::date;

    #[test]
    fn enums_round_trip_through_their_names() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
        for priority in TaskPriority::ALL {
            assert_eq!(priority.to_string().parse::<TaskPriority>(), Ok(priority));
        }
        for category in TaskCategory::ALL {
            assert_eq!(category.to_string().parse::<TaskCategory>(), Ok(category));
        }
    }

    #[test]
    fn unknown_names_list_the_expected_values() {
        let err = "urgent".parse::<TaskPriority>().unwrap_err();
        assert_eq!(err.to_string(), "'urgent' is not one of [low, normal, high]");
        assert!("Work".parse::<TaskCategory>().is_err());
    }

    #[test]
    fn ranks_follow_the_canonical_order() {
        assert!(TaskPriority::High.rank() < TaskPriority::Normal.rank());
        assert!(TaskPriority::Normal.rank() < TaskPriority::Low.rank());
        assert!(TaskStatus::NotCompleted.rank() < TaskStatus::Completed.rank());
        assert!(TaskCategory::Work.rank() < TaskCategory::Study.rank());
        assert!(TaskCategory::Study.rank() < TaskCategory::Personal.rank());
    }

    #[test]
    fn task_serializes_with_ordered_keys_and_plain_date() {
        let task = Task {
            id: "task-1".to_string(),
            name: "demo".to_string(),
            description: String::new(),
            status: TaskStatus::NotCompleted,
            priority: TaskPriority::High,
            category: TaskCategory::Work,
            deadline: date!(2024 - 12 - 21),
        };

        let json = serde_json::to_string(&task).unwrap();

        assert_eq!(
            json,
            "{\"id\":\"task-1\",\"name\":\"demo\",\"description\":\"\",\"status\":\"not_completed\",\"priority\":\"high\",\"category\":\"work\",\"deadline\":\"2024-12-21\"}"
        );
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn deadline_requires_a_real_padded_date() {
        assert_eq!(
            deadline_format::parse("2024-02-29").unwrap(),
            date!(2024 - 02 - 29)
        );
        assert!(deadline_format::parse("2023-02-29").is_err());
        assert!(deadline_format::parse("2024-20-08").is_err());
        assert!(deadline_format::parse("2024-1-5").is_err());
        assert!(deadline_format::parse("2024 12 22").is_err());
        assert!(deadline_format::parse("").is_err());
    }
}
