use std::io::{BufRead, Write};

use anyhow::Result;
use rand::Rng;

use super::session::{SessionEnd, wait_for_go};

pub(crate) fn read_show_list<I: BufRead>(input: &mut I) -> Result<Vec<String>> {
    let mut shows = Vec::new();
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let show = line.trim_end_matches(['\r', '\n']);
        if show.is_empty() {
            break;
        }
        shows.push(show.to_string());
    }
    Ok(shows)
}

pub(crate) fn run_legacy<I, W, G>(input: &mut I, out: &mut W, rng: &mut G) -> Result<SessionEnd>
where
    I: BufRead,
    W: Write,
    G: Rng,
{
    let mut shows = read_show_list(input)?;
    let total = shows.len();

    for position in 1..=total {
        let show = shows.swap_remove(rng.gen_range(0..shows.len()));
        write!(out, "{position}/{total} - {show}")?;
        out.flush()?;
        if !wait_for_go(input)? {
            writeln!(out)?;
            return Ok(SessionEnd::Cancelled);
        }
    }

    Ok(SessionEnd::Finished)
}
