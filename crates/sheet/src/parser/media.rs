//! `@media` query lists.
//!
//! ```text
//! screen and (min-width: 600px), print
//! not handheld and (orientation: landscape)
//! (max-width: 40em)
//! ```

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag_no_case, take_till},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map_opt, opt},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::environment::Environment;
use crate::error::StyleSyntaxError;
use crate::parser::values::{parse_ident, parse_length, split_top_level};

/// A parenthesised feature test such as `(min-width: 600px)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaFeature {
    pub name: String,
    pub value: Option<String>,
}

impl MediaFeature {
    fn from_inner(inner: &str) -> Option<Self> {
        let (name, value) = match inner.split_once(':') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (inner.trim(), None),
        };
        if name.is_empty() || value.is_some_and(str::is_empty) {
            return None;
        }
        Some(Self {
            name: name.to_ascii_lowercase(),
            value: value.map(str::to_string),
        })
    }

    /// Unknown features never match.
    pub fn matches(&self, env: &Environment) -> bool {
        let length = || self.value.as_deref().and_then(parse_length);
        match (self.name.as_str(), self.value.as_deref()) {
            ("width" | "height" | "orientation" | "color", None) => true,
            ("width", Some(_)) => length().is_some_and(|w| (w - env.width).abs() < f64::EPSILON),
            ("min-width", Some(_)) => length().is_some_and(|w| env.width >= w),
            ("max-width", Some(_)) => length().is_some_and(|w| env.width <= w),
            ("height", Some(_)) => {
                length().is_some_and(|h| (h - env.height).abs() < f64::EPSILON)
            }
            ("min-height", Some(_)) => length().is_some_and(|h| env.height >= h),
            ("max-height", Some(_)) => length().is_some_and(|h| env.height <= h),
            ("orientation", Some(value)) => value.eq_ignore_ascii_case(env.orientation()),
            _ => false,
        }
    }
}

/// One comma-separated query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaQuery {
    pub negated: bool,
    /// `None` when the query starts with a feature.
    pub media_type: Option<String>,
    pub features: Vec<MediaFeature>,
}

impl MediaQuery {
    pub fn parse(text: &str) -> Result<Self, StyleSyntaxError> {
        all_consuming(media_query)(text.trim())
            .map(|(_, query)| query)
            .map_err(|_| StyleSyntaxError::new(format!("malformed media query '{}'", text.trim())))
    }

    pub fn matches(&self, env: &Environment) -> bool {
        let type_matches = self.media_type.as_deref().is_none_or(|media_type| {
            media_type.eq_ignore_ascii_case("all") || media_type.eq_ignore_ascii_case(&env.device)
        });
        let result = type_matches && self.features.iter().all(|f| f.matches(env));
        result != self.negated
    }
}

/// A comma-separated list of queries. Matches when any query does; an
/// empty list matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaQueryList {
    pub queries: Vec<MediaQuery>,
}

impl MediaQueryList {
    /// # Example
    ///
    /// ```
    /// use sheet::Environment;
    /// use sheet::parser::media::MediaQueryList;
    ///
    /// let list = MediaQueryList::parse("print, screen and (max-width: 600px)").unwrap();
    /// assert!(list.matches(&Environment::new(480.0, 800.0)));
    /// assert!(!list.matches(&Environment::new(1280.0, 800.0)));
    /// ```
    pub fn parse(text: &str) -> Result<Self, StyleSyntaxError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let queries = split_top_level(text, ',')
            .into_iter()
            .map(MediaQuery::parse)
            .collect::<Result<_, _>>()?;
        Ok(Self { queries })
    }

    pub fn matches(&self, env: &Environment) -> bool {
        self.queries.is_empty() || self.queries.iter().any(|q| q.matches(env))
    }
}

fn feature(input: &str) -> IResult<&str, MediaFeature> {
    map_opt(
        delimited(char('('), take_till(|c: char| c == ')'), char(')')),
        MediaFeature::from_inner,
    )(input)
}

fn and_keyword(input: &str) -> IResult<&str, &str> {
    delimited(multispace0, tag_no_case("and"), multispace0)(input)
}

fn typed_query(input: &str) -> IResult<&str, (Option<&str>, Vec<MediaFeature>)> {
    let (input, media_type) = parse_ident(input)?;
    let (input, features) =
        many0(preceded(tuple((multispace1, tag_no_case("and"), multispace0)), feature))(input)?;
    Ok((input, (Some(media_type), features)))
}

fn feature_query(input: &str) -> IResult<&str, (Option<&str>, Vec<MediaFeature>)> {
    let (input, features) = separated_list1(and_keyword, feature)(input)?;
    Ok((input, (None, features)))
}

fn media_query(input: &str) -> IResult<&str, MediaQuery> {
    let (input, qualifier) = opt(terminated(
        alt((tag_no_case("not"), tag_no_case("only"))),
        multispace1,
    ))(input)?;
    let (input, (media_type, features)) = alt((typed_query, feature_query))(input)?;
    Ok((
        input,
        MediaQuery {
            negated: qualifier.is_some_and(|q| q.eq_ignore_ascii_case("not")),
            media_type: media_type.map(str::to_ascii_lowercase),
            features,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(width: f64, height: f64) -> Environment {
        Environment::new(width, height)
    }

    #[test]
    fn typed_query_with_features() {
        let q = MediaQuery::parse("screen and (min-width: 600px) and (orientation: landscape)")
            .unwrap();
        assert_eq!(q.media_type.as_deref(), Some("screen"));
        assert_eq!(q.features.len(), 2);
        assert!(q.matches(&env(800.0, 600.0)));
        assert!(!q.matches(&env(500.0, 600.0)));
        assert!(!q.matches(&env(800.0, 900.0)));
    }

    #[test]
    fn feature_only_query() {
        let q = MediaQuery::parse("(max-width: 40em)").unwrap();
        assert_eq!(q.media_type, None);
        assert!(q.matches(&env(640.0, 480.0)));
        assert!(!q.matches(&env(641.0, 480.0)));
    }

    #[test]
    fn negation_and_only() {
        assert!(MediaQuery::parse("not print").unwrap().matches(&env(1.0, 1.0)));
        assert!(!MediaQuery::parse("not screen").unwrap().matches(&env(1.0, 1.0)));
        assert!(MediaQuery::parse("only screen").unwrap().matches(&env(1.0, 1.0)));
    }

    #[test]
    fn media_type_follows_environment() {
        let print = Environment::default().with_device("print");
        assert!(MediaQuery::parse("PRINT").unwrap().matches(&print));
        assert!(MediaQuery::parse("all").unwrap().matches(&print));
        assert!(!MediaQuery::parse("screen").unwrap().matches(&print));
    }

    #[test]
    fn bare_and_unknown_features() {
        assert!(MediaQuery::parse("(color)").unwrap().matches(&env(1.0, 1.0)));
        assert!(!MediaQuery::parse("(min-resolution: 2dppx)").unwrap().matches(&env(1.0, 1.0)));
        assert!(!MediaQuery::parse("(min-width: wide)").unwrap().matches(&env(1.0, 1.0)));
    }

    #[test]
    fn malformed_queries() {
        for text in ["screen and", "(min-width: 1px", "screen (color)", "()", "(width:)", ","] {
            assert!(MediaQueryList::parse(text).is_err(), "{text:?} should fail");
        }
    }

    #[test]
    fn empty_list_matches() {
        assert!(MediaQueryList::parse("  ").unwrap().matches(&env(1.0, 1.0)));
    }
}
