use std::sync::{Arc, LazyLock};

use facet::Facet;
use jolyglot::{
    Class, Described, FacetJsonSpeaker, Jolyglot, JolyglotGenerics, SerdeJsonSpeaker,
    SimdJsonSpeaker, SpeakerOptions, TypeDesc, TypeFactory, Value,
};
use jolyglot_testhelpers::test;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Facet)]
struct Person {
    name: String,
    age: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Facet)]
struct Page<T> {
    items: Vec<T>,
    total: u64,
}

fn person_class() -> Arc<Class> {
    static CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| {
        Class::builder("Person")
            .required_field("name", TypeDesc::string())
            .required_field("age", TypeDesc::integer())
            .build()
    });
    Arc::clone(&CLASS)
}

fn page_class() -> Arc<Class> {
    static CLASS: LazyLock<Arc<Class>> = LazyLock::new(|| {
        Class::builder("Page")
            .type_param("T")
            .required_field("items", TypeDesc::list_of(TypeDesc::var("T")))
            .required_field("total", TypeDesc::integer())
            .build()
    });
    Arc::clone(&CLASS)
}

impl Described for Person {
    fn type_desc() -> TypeDesc {
        TypeDesc::class(person_class())
    }
}

impl<T: Described> Described for Page<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::parameterized(&page_class(), [T::type_desc()]).unwrap()
    }
}

fn ada() -> Person {
    Person {
        name: "Ada".to_owned(),
        age: 36,
    }
}

const ADA: &str = r#"{"name":"Ada","age":36}"#;
const PAGE: &str = r#"{"items":[{"age":36,"name":"Ada"}],"total":1}"#;

fn object_round_trip<J: Jolyglot<Person>>(speaker: &J) {
    let text = speaker.to_json(&ada()).unwrap();
    assert_eq!(text, ADA);
    let back: Person = speaker.from_json(&text).unwrap();
    assert_eq!(back, ada());
}

#[test]
fn object_to_json_on_every_speaker() {
    object_round_trip(&SerdeJsonSpeaker::new());
    object_round_trip(&SimdJsonSpeaker::new());
    object_round_trip(&FacetJsonSpeaker::new());
}

#[test]
fn generic_to_json_on_generic_speakers() {
    let page = Page {
        items: vec![ada()],
        total: 1,
    };
    let ty = TypeDesc::of::<Page<Person>>();
    assert_eq!(ty.to_string(), "Page<Person>");

    let speakers: [&dyn JolyglotGenerics<Page<Person>>; 2] =
        [&SerdeJsonSpeaker::new(), &SimdJsonSpeaker::new()];
    for speaker in speakers {
        assert_eq!(speaker.to_json_typed(&page, &ty).unwrap(), PAGE);
        let back = speaker.from_json_typed(PAGE, &ty).unwrap();
        assert_eq!(back, page);
    }
}

#[test]
fn json_to_generic_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.json");
    std::fs::write(&path, PAGE).unwrap();

    let speaker = SimdJsonSpeaker::new();
    let ty = speaker
        .new_parameterized_type(&page_class(), vec![TypeDesc::any()])
        .unwrap();
    let page: Page<Value> = speaker.from_json_file_typed(&path, &ty).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0]["name"], "Ada");
}

#[test]
fn every_speaker_agrees_on_failures() {
    let speakers: [&dyn Jolyglot<Person>; 3] = [
        &SerdeJsonSpeaker::new(),
        &SimdJsonSpeaker::new(),
        &FacetJsonSpeaker::new(),
    ];
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    for speaker in speakers {
        assert!(speaker.from_json(r#"{"name":"Ada""#).unwrap_err().is_decoding());
        assert!(speaker.from_json_file(&missing).unwrap_err().is_io());
    }
}

#[test]
fn strict_options_apply_to_typed_decoding_only() {
    let speaker = SerdeJsonSpeaker::with_options(SpeakerOptions::new().deny_unknown_fields());
    let text = r#"{"name":"Ada","age":36,"nickname":"Countess"}"#;
    let ty = TypeDesc::of::<Person>();
    let err = JolyglotGenerics::<Person>::from_json_typed(&speaker, text, &ty).unwrap_err();
    assert!(err.is_decoding());
    let person: Person = speaker.from_json(text).unwrap();
    assert_eq!(person, ada());
}
