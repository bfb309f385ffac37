use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Devanagari,
    Latin,
}

/// A maximal stretch of text drawn with one font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRun {
    pub script: Script,
    pub text: String,
}

pub fn is_devanagari(ch: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&ch)
}

fn script_of(ch: char) -> Script {
    if is_devanagari(ch) {
        Script::Devanagari
    } else {
        Script::Latin
    }
}

/// Split `text` into alternating Devanagari / non-Devanagari runs.
/// Concatenating the runs gives back `text`.
pub fn segment_scripts(text: &str) -> Vec<ScriptRun> {
    let mut runs: Vec<ScriptRun> = Vec::new();
    for ch in text.chars() {
        let script = script_of(ch);
        match runs.last_mut() {
            Some(run) if run.script == script => run.text.push(ch),
            _ => runs.push(ScriptRun {
                script,
                text: ch.to_string(),
            }),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(script: Script, text: &str) -> ScriptRun {
        ScriptRun {
            script,
            text: text.into(),
        }
    }

    #[test]
    fn test_mixed_label() {
        assert_eq!(
            segment_scripts("मिति: २०८१-०१-०१"),
            vec![
                run(Script::Devanagari, "मिति"),
                run(Script::Latin, ": "),
                run(Script::Devanagari, "२०८१"),
                run(Script::Latin, "-"),
                run(Script::Devanagari, "०१"),
                run(Script::Latin, "-"),
                run(Script::Devanagari, "०१"),
            ]
        );
    }

    #[test]
    fn test_single_script() {
        assert_eq!(segment_scripts("Nabil Bank"), vec![run(Script::Latin, "Nabil Bank")]);
        assert_eq!(segment_scripts("कुल रकम").len(), 3);
        assert!(segment_scripts("").is_empty());
    }

    #[test]
    fn test_runs_concatenate_to_input() {
        let text = "MU१२३४ (ऋण) Rs. ११००.००";
        let joined: String = segment_scripts(text).into_iter().map(|r| r.text).collect();
        assert_eq!(joined, text);
    }
}
