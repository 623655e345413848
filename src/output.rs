use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Result};

use crate::scraper::Match;

pub fn print_matches<W: Write>(out: &mut W, matches: &[Match]) -> Result<()> {
    for m in matches {
        writeln!(out, "{}\t{}\t{}", m.keyword, m.link, m.title)?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_tsv<P: AsRef<Path>>(tsv_file: P, matches: &[Match]) -> Result<()> {
    if tsv_file.as_ref().exists() {
        return Err(anyhow!(
            "File already exists: {}",
            tsv_file.as_ref().display()
        ));
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .delimiter(b'\t')
        .from_path(tsv_file)?;

    for m in matches {
        wtr.serialize(m)?;
    }
    wtr.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn tree() -> Match {
        Match {
            keyword: "tree".into(),
            link: "http://supost.com/post/index/101".into(),
            title: "Christmas tree".into(),
        }
    }

    #[test]
    fn prints_one_line_per_match() {
        let mut out = vec![];
        print_matches(&mut out, &[tree()]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "tree\thttp://supost.com/post/index/101\tChristmas tree\n"
        );
    }

    #[test]
    fn tsv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.tsv");

        write_tsv(&path, &[tree()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("keyword\tlink\ttitle"));
        assert_eq!(
            lines.next(),
            Some("tree\thttp://supost.com/post/index/101\tChristmas tree")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn tsv_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.tsv");
        fs::write(&path, "keep me").unwrap();

        assert!(write_tsv(&path, &[tree()]).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }
}
