//! Viewport movements recorded by navigate tokens.

use std::{fmt, str::FromStr};

use crate::error::ValueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NavigationDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// `column` for horizontal moves, `row` for vertical ones.
    fn step_unit(self) -> &'static str {
        match self {
            Self::Left | Self::Right => "column",
            Self::Up | Self::Down => "row",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationAmount {
    /// One column or row.
    Step,
    Pixels(u32),
}

/// A single movement such as `left column` or `down 50px`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Navigation {
    direction: NavigationDirection,
    amount: NavigationAmount,
}

impl Navigation {
    pub fn new(direction: NavigationDirection, amount: NavigationAmount) -> Self {
        Self { direction, amount }
    }

    pub fn direction(self) -> NavigationDirection {
        self.direction
    }

    pub fn amount(self) -> NavigationAmount {
        self.amount
    }

    /// Parses a comma separated list. An empty text is an empty list.
    pub fn parse_list(text: &str) -> Result<Vec<Self>, ValueError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        text.split(',').map(str::parse).collect()
    }

    /// Renders a list in the form accepted by [`Navigation::parse_list`].
    pub fn list_to_string(navigations: &[Self]) -> String {
        navigations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for Navigation {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::invalid("navigation", s);
        let (direction, amount) = s.split_once(' ').ok_or_else(invalid)?;

        let direction = match direction {
            "left" => NavigationDirection::Left,
            "right" => NavigationDirection::Right,
            "up" => NavigationDirection::Up,
            "down" => NavigationDirection::Down,
            _ => return Err(invalid()),
        };

        let amount = if amount == direction.step_unit() {
            NavigationAmount::Step
        } else {
            amount
                .strip_suffix("px")
                .and_then(|px| px.parse().ok())
                .map(NavigationAmount::Pixels)
                .ok_or_else(invalid)?
        };

        Ok(Self::new(direction, amount))
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.amount {
            NavigationAmount::Step => {
                write!(f, "{} {}", self.direction.as_str(), self.direction.step_unit())
            }
            NavigationAmount::Pixels(px) => write!(f, "{} {px}px", self.direction.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let navigations = Navigation::parse_list("left column,down 50px,up row").unwrap();
        assert_eq!(
            navigations,
            vec![
                Navigation::new(NavigationDirection::Left, NavigationAmount::Step),
                Navigation::new(NavigationDirection::Down, NavigationAmount::Pixels(50)),
                Navigation::new(NavigationDirection::Up, NavigationAmount::Step),
            ]
        );
        assert_eq!(
            Navigation::list_to_string(&navigations),
            "left column,down 50px,up row"
        );
        assert_eq!(Navigation::parse_list(""), Ok(Vec::new()));
    }

    #[test]
    fn test_unit_must_match_direction() {
        assert!("left row".parse::<Navigation>().is_err());
        assert!("up column".parse::<Navigation>().is_err());
        assert!("sideways 5px".parse::<Navigation>().is_err());
        assert!("right 5".parse::<Navigation>().is_err());
    }
}
