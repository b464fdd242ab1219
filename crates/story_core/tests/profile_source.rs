use story_core::{parse_profile_table, shorten_url, Platform, Profile, SourceError};

fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

#[test]
fn parses_mixed_platform_rows_and_drops_empty_ones() {
    let rows = table(&[
        &["Name", "Instagram", "Facebook"],
        &["Alice", "ig.co/a", ""],
        &["Bob", "", "fb.co/b"],
        &["Carl", "", ""],
    ]);

    let profiles = parse_profile_table(&rows).expect("parse");
    assert_eq!(
        profiles,
        vec![
            Profile::instagram("Alice", "ig.co/a"),
            Profile::facebook("Bob", "fb.co/b"),
        ]
    );
}

#[test]
fn instagram_is_primary_and_facebook_is_retained() {
    let rows = table(&[
        &["name", "Instagram URL", "Facebook Page"],
        &["Dana", "https://instagram.com/dana", "https://facebook.com/dana"],
    ]);

    let profiles = parse_profile_table(&rows).expect("parse");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].platform, Platform::Instagram);
    assert_eq!(profiles[0].url, "https://instagram.com/dana");
    assert_eq!(profiles[0].facebook_url, "https://facebook.com/dana");
}

#[test]
fn header_match_is_case_insensitive_and_columns_may_be_reordered() {
    let rows = table(&[
        &["FACEBOOK", "Full Name"],
        &["https://facebook.com/eve", "Eve"],
        &["", "Nameless Page"],
        &["https://facebook.com/x"],
    ]);

    let profiles = parse_profile_table(&rows).expect("parse");
    assert_eq!(profiles, vec![Profile::facebook("Eve", "https://facebook.com/eve")]);
}

#[test]
fn count_matches_rows_with_name_and_some_url() {
    let rows = table(&[
        &["Name", "Instagram", "Facebook"],
        &["A", "ig/a", ""],
        &["", "ig/none", ""],
        &["B", "", "fb/b"],
        &["C", "ig/c", "fb/c"],
        &["D"],
        &["  ", "ig/blank-name", ""],
    ]);

    assert_eq!(parse_profile_table(&rows).expect("parse").len(), 3);
}

#[test]
fn too_few_rows_is_a_data_error() {
    assert_eq!(
        parse_profile_table(&table(&[&["Name", "Instagram"]])),
        Err(SourceError::InsufficientData)
    );
    assert_eq!(parse_profile_table(&[]), Err(SourceError::InsufficientData));
}

#[test]
fn missing_columns_are_reported() {
    let no_platform = table(&[&["Name", "Twitter"], &["A", "x"]]);
    assert_eq!(
        parse_profile_table(&no_platform),
        Err(SourceError::MissingColumns)
    );

    let no_name = table(&[&["Who", "Instagram"], &["A", "ig/a"]]);
    assert_eq!(parse_profile_table(&no_name), Err(SourceError::MissingColumns));
}

#[test]
fn shorten_url_truncates_long_paths() {
    assert_eq!(
        shorten_url("https://www.instagram.com/a_very_long_profile_name/"),
        "www.instagram.com/a_very_long_profi..."
    );
    assert_eq!(shorten_url("https://x.com/a"), "x.com/a");
    assert_eq!(shorten_url("not a url"), "not a url");
}
