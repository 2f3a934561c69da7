use daily_brief::corpus::{merge_corpus, CorpusSection};

#[test]
fn sections_are_labeled_and_ordered() {
    let corpus = merge_corpus(&[
        CorpusSection {
            label: "Emails",
            body: Some("From: Jane\nSubject: Hello\nSee attached."),
        },
        CorpusSection {
            label: "Tasks",
            body: Some("Finish report"),
        },
    ]);

    assert_eq!(
        corpus,
        "--- Emails ---\nFrom: Jane\nSubject: Hello\nSee attached.\n\n--- Tasks ---\nFinish report"
    );
}

#[test]
fn absent_and_blank_sections_are_skipped() {
    let corpus = merge_corpus(&[
        CorpusSection {
            label: "Emails",
            body: Some("   \n  "),
        },
        CorpusSection {
            label: "Tasks",
            body: Some("Finish report"),
        },
        CorpusSection {
            label: "Notes",
            body: None,
        },
    ]);

    assert_eq!(corpus, "--- Tasks ---\nFinish report");
}

#[test]
fn all_empty_input_yields_an_empty_corpus() {
    let corpus = merge_corpus(&[
        CorpusSection {
            label: "Emails",
            body: None,
        },
        CorpusSection {
            label: "Tasks",
            body: None,
        },
    ]);

    assert!(corpus.is_empty());
}

#[test]
fn merging_is_idempotent() {
    let sections = [
        CorpusSection {
            label: "Emails",
            body: Some("From: Jane\nSubject: Hi\nsnippet"),
        },
        CorpusSection {
            label: "Tasks",
            body: Some("Task one\nTask two"),
        },
    ];

    assert_eq!(merge_corpus(&sections), merge_corpus(&sections));
}
