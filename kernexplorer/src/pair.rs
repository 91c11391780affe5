//! glyph pairs on the command line

use std::str::FromStr;

/// Two glyph ids, written as `first,second`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pair {
    pub first: u16,
    pub second: u16,
}

impl FromStr for Pair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, second) = s
            .split_once(',')
            .ok_or_else(|| format!("expected FIRST,SECOND, found '{s}'"))?;
        let parse = |raw: &str| {
            raw.trim()
                .parse::<u16>()
                .map_err(|e| format!("invalid glyph id '{raw}': {e}"))
        };
        Ok(Pair {
            first: parse(first)?,
            second: parse(second)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pairs() {
        assert_eq!(
            "100,200".parse::<Pair>(),
            Ok(Pair {
                first: 100,
                second: 200
            })
        );
        assert_eq!(
            " 7 , 8".parse::<Pair>().map(|pair| (pair.first, pair.second)),
            Ok((7, 8))
        );
        assert!("100".parse::<Pair>().is_err());
        assert!("100,x".parse::<Pair>().is_err());
        assert!("100,70000".parse::<Pair>().is_err());
    }
}
