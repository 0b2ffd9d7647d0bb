use darknut::{Block, Document, ErrorKind, Unmarshal, UnmarshalError};
use darknut_testhelpers::test;
use indoc::indoc;

#[derive(Debug, Default, Unmarshal)]
struct Planning {
    #[newsdoc("meta,type=core/assignment")]
    assignments: Vec<Assignment>,
}

#[derive(Debug, Default, Unmarshal)]
struct Assignment {
    #[newsdoc("data.status")]
    status: String,
    #[newsdoc("links,rel=assignee")]
    assignees: Vec<Assignee>,
}

#[derive(Debug, Default, Unmarshal)]
struct Assignee {
    #[newsdoc("data.share")]
    share: u8,
}

fn planning(json: &str) -> Document {
    serde_json::from_str(json).unwrap()
}

#[test]
fn nested_errors_name_every_level() {
    let doc = planning(indoc! {r#"
        {
            "meta": [
                {
                    "type": "core/assignment",
                    "data": {"status": "draft"},
                    "links": [
                        {"rel": "assignee", "data": {"share": "50"}},
                        {"rel": "assignee", "data": {"share": "half"}}
                    ]
                }
            ]
        }
    "#});

    let err = darknut::from_document::<Planning>(&doc).unwrap_err();

    insta::assert_snapshot!(err, @r#"failed to unmarshal blocks for Planning.assignments: failed to unmarshal blocks for Assignment.assignees: failed to unmarshal Assignee.share: invalid 8-bit unsigned integer "half": invalid digit found in string"#);
    assert_eq!(err.kind(), ErrorKind::InvalidUint);

    let path: Vec<String> = err.path().iter().map(ToString::to_string).collect();
    assert_eq!(
        path,
        ["Planning.assignments", "Assignment.assignees", "Assignee.share"]
    );
}

#[test]
fn missing_value_inside_block() {
    let doc = planning(indoc! {r#"
        {
            "meta": [
                {"type": "core/assignment", "data": null}
            ]
        }
    "#});

    let err = darknut::from_document::<Planning>(&doc).unwrap_err();

    insta::assert_snapshot!(err, @"failed to unmarshal blocks for Planning.assignments: failed to unmarshal Assignment.status: missing required value");
    assert!(matches!(
        err.root_cause(),
        UnmarshalError::MissingRequiredValue {
            type_name: "Assignment",
            field: "status",
        }
    ));
}

#[derive(Debug, Default, Unmarshal)]
struct Article {
    #[newsdoc("meta,type=core/newsvalue")]
    newsvalue: NewsValue,
}

#[derive(Debug, Default, Unmarshal)]
struct NewsValue {
    #[newsdoc("value")]
    value: u8,
}

#[test]
fn missing_required_block() {
    let err = darknut::from_document::<Article>(&Document::default()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingRequiredBlock);
    insta::assert_snapshot!(err, @"missing required block for Article.newsvalue");
}

#[derive(Debug, Default, Unmarshal)]
struct Malformed {
    #[newsdoc("title,,optional")]
    title: String,
}

#[derive(Debug, Default, Unmarshal)]
struct EmptyKey {
    #[newsdoc("links,=core/article")]
    links: Vec<NewsValue>,
}

#[derive(Debug, Default, Unmarshal)]
struct EmptyName {
    #[newsdoc(",optional")]
    value: Option<String>,
}

#[test]
fn malformed_annotations() {
    let err = darknut::from_document::<Malformed>(&Document::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagParse);
    insta::assert_snapshot!(err, @r#"failed to parse annotation for Malformed.title: invalid annotation "title,,optional": option 1 is empty"#);

    let err = darknut::from_document::<EmptyKey>(&Document::default()).unwrap_err();
    insta::assert_snapshot!(err, @r#"failed to parse annotation for EmptyKey.links: invalid annotation "links,=core/article": option "=core/article" has an empty key"#);

    let err = darknut::from_block::<EmptyName>(&Block::default()).unwrap_err();
    insta::assert_snapshot!(err, @r#"failed to parse annotation for EmptyName.value: invalid annotation ",optional": empty name"#);
}

#[test]
fn error_sources_chain() {
    let doc = Document {
        meta: vec![Block {
            r#type: "core/newsvalue".into(),
            value: "high".into(),
            ..Default::default()
        }],
        ..Default::default()
    };

    let err = darknut::from_document::<Article>(&doc).unwrap_err();

    let mut chain = Vec::new();
    let mut current: Option<&dyn std::error::Error> = Some(&err);
    while let Some(e) = current {
        chain.push(e.to_string());
        current = e.source();
    }

    assert_eq!(chain.len(), 4);
    assert_eq!(chain[3], "invalid digit found in string");
    assert_eq!(err.field().to_string(), "Article.newsvalue");
}
