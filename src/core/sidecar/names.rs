/// Normalise an extension to its dotted form (`summary` -> `.summary`).
pub fn dotted(extension: &str) -> String {
    let ext = extension.trim();
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

fn push_unique(out: &mut Vec<String>, name: String) {
    if !out.contains(&name) {
        out.push(name);
    }
}

/// Season variants to try: the captured form first, then without leading zeros.
fn season_forms(season: &str) -> Vec<String> {
    let season = season.trim();
    let mut forms = vec![season.to_string()];
    let unpadded = season.trim_start_matches('0');
    let unpadded = if unpadded.is_empty() && !season.is_empty() { "0" } else { unpadded };
    if unpadded != season {
        forms.push(unpadded.to_string());
    }
    forms
}

/// Candidate file names for a season-level sidecar, in priority order.
pub fn season_file_names(show_title: &str, season: &str, extension: &str) -> Vec<String> {
    let ext = dotted(extension);
    let show = show_title.trim();
    let mut out = Vec::new();
    for s in season_forms(season) {
        if !show.is_empty() {
            push_unique(&mut out, format!("{show}-S{s}{ext}"));
            push_unique(&mut out, format!("{show}-s{s}{ext}"));
            let lower = show.to_lowercase();
            push_unique(&mut out, format!("{lower}-S{s}{ext}"));
            push_unique(&mut out, format!("{lower}-s{s}{ext}"));
        }
        for token in ["season", "Season", "chapter", "Chapter", "lesson", "Lesson"] {
            push_unique(&mut out, format!("{token}-{s}{ext}"));
        }
        push_unique(&mut out, format!("S{s}{ext}"));
        push_unique(&mut out, format!("s{s}{ext}"));
    }
    out
}

/// Candidate file names for a show-level sidecar, in priority order.
pub fn show_file_names(show_title: &str, extension: &str) -> Vec<String> {
    let ext = dotted(extension);
    let show = show_title.trim();
    let mut out = Vec::new();
    if !show.is_empty() {
        push_unique(&mut out, format!("{show}{ext}"));
        push_unique(&mut out, format!("{}{ext}", show.to_lowercase()));
    }
    push_unique(&mut out, format!("show{ext}"));
    push_unique(&mut out, format!("Show{ext}"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_names_cover_conventions() {
        let names = season_file_names("My Show", "01", ".summary");
        assert_eq!(names[0], "My Show-S01.summary");
        assert_eq!(names[1], "My Show-s01.summary");
        for expected in [
            "my show-S01.summary",
            "season-01.summary",
            "Season-01.summary",
            "S01.summary",
            "s01.summary",
            "chapter-01.summary",
            "Lesson-01.summary",
            "My Show-S1.summary",
            "season-1.summary",
            "s1.summary",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
        // padded forms come before unpadded ones
        let padded = names.iter().position(|n| n == "s01.summary").unwrap();
        let unpadded = names.iter().position(|n| n == "s1.summary").unwrap();
        assert!(padded < unpadded);
    }

    #[test]
    fn zero_season_keeps_a_digit() {
        let names = season_file_names("Show", "00", "metadata");
        assert!(names.contains(&"Show-S00.metadata".to_string()));
        assert!(names.contains(&"Show-S0.metadata".to_string()));
    }

    #[test]
    fn show_names_fall_back_to_literal_token() {
        assert_eq!(
            show_file_names("Show", "summary"),
            vec!["Show.summary".to_string(), "show.summary".to_string()]
        );
        assert_eq!(
            show_file_names("My Show", ".summary"),
            vec![
                "My Show.summary".to_string(),
                "my show.summary".to_string(),
                "show.summary".to_string(),
                "Show.summary".to_string(),
            ]
        );
    }
}
