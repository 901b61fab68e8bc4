use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Raised when a string does not name one of an enum's choices
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{0}\" is not a valid choice.")]
pub struct InvalidChoice(pub String);

/// Declares a closed set of labelled choices stored as a PostgreSQL enum.
///
/// The label is used verbatim on the wire, in the database and in `Display`.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $pg_type:tt {
            $( $variant:ident => $label:tt ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
        #[sqlx(type_name = $pg_type)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                #[sqlx(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every choice, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the wire label of this choice
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InvalidChoice;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($label => Ok($name::$variant),)+
                    other => Err(InvalidChoice(other.to_string())),
                }
            }
        }
    };
}

choice_enum! {
    /// Academic term in which the course was taken
    pub enum Term as "review_term" {
        Spring => "Spring",
        Summer => "Summer",
        Fall => "Fall",
    }
}

choice_enum! {
    /// Letter grade the reviewer received
    pub enum Grade as "review_grade" {
        F => "F",
        DMinus => "D-",
        D => "D",
        DPlus => "D+",
        CMinus => "C-",
        C => "C",
        CPlus => "C+",
        BMinus => "B-",
        B => "B",
        BPlus => "B+",
        AMinus => "A-",
        A => "A",
        APlus => "A+",
        // withheld, or taken pass/fail
        NotApplicable => "N/A",
    }
}

choice_enum! {
    /// How the course was delivered
    pub enum DeliveryMethod as "review_delivery_method" {
        Online => "Online",
        InPerson => "In Person",
        Hybrid => "Hybrid",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_parses_exact_labels() {
        assert_eq!("Spring".parse::<Term>(), Ok(Term::Spring));
        assert_eq!("Summer".parse::<Term>(), Ok(Term::Summer));
        assert_eq!("Fall".parse::<Term>(), Ok(Term::Fall));
    }

    #[test]
    fn term_rejects_unknown_label() {
        let err = "Invalid Term".parse::<Term>().unwrap_err();
        assert_eq!(err.to_string(), "\"Invalid Term\" is not a valid choice.");
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert!("fall".parse::<Term>().is_err());
        assert!("online".parse::<DeliveryMethod>().is_err());
    }

    #[test]
    fn grade_labels_with_symbols() {
        assert_eq!("A+".parse::<Grade>(), Ok(Grade::APlus));
        assert_eq!("D-".parse::<Grade>(), Ok(Grade::DMinus));
        assert_eq!("N/A".parse::<Grade>(), Ok(Grade::NotApplicable));
        assert_eq!(Grade::ALL.len(), 14);
    }

    #[test]
    fn delivery_method_display_uses_label() {
        assert_eq!(DeliveryMethod::InPerson.to_string(), "In Person");
        assert_eq!(DeliveryMethod::ALL.len(), 3);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&DeliveryMethod::InPerson).unwrap();
        assert_eq!(json, "\"In Person\"");

        let grade: Grade = serde_json::from_str("\"B+\"").unwrap();
        assert_eq!(grade, Grade::BPlus);
    }
}
