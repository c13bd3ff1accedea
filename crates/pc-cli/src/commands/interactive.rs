use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use pc_chart::{ChartRenderer, ChartStyle, SvgRenderer, TerminalRenderer};
use pc_core::{ChapterSpec, ChartKind, ChartRequest, CountMode, Corpus, PovResult, report};

use crate::config::Settings;

const QUIT: [&str; 3] = ["quit", "exit", "q"];

/// Raw answers to one round of prompts.
struct Answers {
    kind: String,
    chapters: String,
    title: String,
    alternate: String,
    pov_only: String,
    count: String,
}

impl Answers {
    fn into_request(self) -> PovResult<ChartRequest> {
        let kind: ChartKind = self.kind.parse()?;
        let chapters: ChapterSpec = self.chapters.parse()?;
        let count = report::parse_count(&self.count)?;
        let title = match self.title.trim() {
            "" | "None" => None,
            t => Some(t.to_string()),
        };
        let mode = CountMode::default()
            .with_alternate_identities(is_yes(&self.alternate))
            .with_pov_only(is_yes(&self.pov_only));

        Ok(ChartRequest::new(kind)
            .with_chapters(chapters)
            .with_title(title)
            .with_mode(mode)
            .with_count(count))
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

pub fn run(settings: &Settings, svg_dir: Option<&Path>) -> Result<(), String> {
    let corpus = super::load_corpus(settings)?;

    if let Some(dir) = svg_dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("cannot create {}: {e}", dir.display()))?;
    }

    println!(
        "  {} {} scenes, {} characters",
        "Loaded".bold(),
        corpus.scenes.len(),
        corpus.registry.character_count()
    );
    println!("  Type 'quit' at the graph type prompt to exit.\n");

    let stdin = io::stdin();
    let stdout = io::stdout();
    session(&corpus, &settings.style, svg_dir, stdin.lock(), stdout.lock())
}

/// Prompt for charts until the user quits or input ends.
fn session<R: BufRead, W: Write>(
    corpus: &Corpus,
    style: &ChartStyle,
    svg_dir: Option<&Path>,
    mut input: R,
    mut out: W,
) -> Result<(), String> {
    let terminal = TerminalRenderer::new(style.clone());
    let svg = SvgRenderer::new(style.clone());
    let mut round = 0usize;

    loop {
        let Some(kind) = prompt(&mut input, &mut out, "Graph type (Bar/Pie/Stacked Bar): ")? else {
            break;
        };
        if QUIT.iter().any(|q| kind.trim().eq_ignore_ascii_case(q)) {
            break;
        }

        let mut rest = Vec::with_capacity(5);
        for question in [
            "Chapters (e.g. \"5\", \"1-4\", \"1,3,7\"): ",
            "Graph title (\"None\" for no title): ",
            "Include alternate identities? (y/n): ",
            "POV characters only? (y/n): ",
            "Number of characters to display: ",
        ] {
            match prompt(&mut input, &mut out, question)? {
                Some(answer) => rest.push(answer),
                None => return Ok(()),
            }
        }
        let mut rest = rest.into_iter();
        let mut next = || rest.next().unwrap_or_default();
        let answers = Answers {
            kind,
            chapters: next(),
            title: next(),
            alternate: next(),
            pov_only: next(),
            count: next(),
        };

        round += 1;
        let rendered = answers
            .into_request()
            .and_then(|request| corpus.chart(&request))
            .map_err(|e| e.to_string())
            .and_then(|chart| {
                let text = terminal.render(&chart).map_err(|e| e.to_string())?;
                let written = match svg_dir {
                    Some(dir) => {
                        let path = dir.join(format!("chart-{round}.svg"));
                        svg.render_to_file(&chart, &path)
                            .map_err(|e| e.to_string())?;
                        Some(path)
                    }
                    None => None,
                };
                Ok((text, written))
            });

        match rendered {
            Ok((text, written)) => {
                writeln!(out, "\n{text}").map_err(|e| e.to_string())?;
                if let Some(path) = written {
                    writeln!(out, "  Saved {}\n", path.display()).map_err(|e| e.to_string())?;
                }
            }
            Err(e) => {
                tracing::debug!(round, error = %e, "chart request failed");
                writeln!(out, "{}\n", format!("error: {e}").yellow())
                    .map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

/// Print `question` and read one line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> Result<Option<String>, String> {
    write!(out, "{question}").map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())?;

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        Corpus::parse(
            "A;Alice\nA (D);Alice\nB;Bob\nO;Other\n",
            "1;A;;100\n1;B;A;50\n2;A (D);B;30\n",
        )
        .unwrap()
    }

    fn run_session(script: &str) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        session(
            &corpus(),
            &ChartStyle::default(),
            None,
            script.as_bytes(),
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn one_round_then_quit() {
        let out = run_session("pie\n1\nNone\nn\nn\n1\nquit\n");
        assert!(out.contains("Graph type"));
        assert!(out.contains("Alice"));
        assert!(out.contains("Other"));
        assert_eq!(out.matches("Graph type").count(), 2);
    }

    #[test]
    fn eof_ends_session() {
        let out = run_session("bar\n1-2\n");
        assert!(out.contains("Graph title"));
        assert!(!out.contains("Alice"));
    }

    #[test]
    fn bad_round_reports_and_continues() {
        let out = run_session("pie\n4-1\nNone\nn\nn\n3\nbar\nall\nWords\ny\nn\n5\n");
        assert!(out.contains("error: invalid chapter spec \"4-1\""));
        assert!(out.contains("Words"));
        assert!(out.contains("A (D)"));
    }

    #[test]
    fn wide_chapter_range_completes_round() {
        let out = run_session("stacked bar\n1-4294967295\nNone\nn\nn\n2\nquit\n");
        assert!(!out.contains("error:"));
        assert!(out.contains("■ Alice"));
        assert_eq!(out.matches("Graph type").count(), 2);
    }

    #[test]
    fn answers_map_to_request() {
        let answers = Answers {
            kind: "Stacked Bar".into(),
            chapters: "1,3".into(),
            title: "None".into(),
            alternate: "Y".into(),
            pov_only: "n".into(),
            count: "4".into(),
        };
        let request = answers.into_request().unwrap();
        assert_eq!(request.kind, ChartKind::StackedBar);
        assert_eq!(request.chapters, ChapterSpec::List(vec![1, 3]));
        assert_eq!(request.title, None);
        assert!(request.mode.alternate_identities);
        assert!(!request.mode.pov_only);
        assert_eq!(request.count, 4);
    }

    #[test]
    fn svg_written_per_round() {
        colored::control::set_override(false);
        let dir = tempfile::TempDir::new().unwrap();
        let mut out = Vec::new();
        session(
            &corpus(),
            &ChartStyle::default(),
            Some(dir.path()),
            "pie\nall\nNone\nn\nn\n2\nq\n".as_bytes(),
            &mut out,
        )
        .unwrap();
        assert!(dir.path().join("chart-1.svg").exists());
    }
}
