//! Test fixtures: a small published course and request bodies.

use std::path::Path;

use serde_json::{json, Value};

pub const COURSE_MAP: &str = r#"{
  "sections": [
    {
      "id": "section-01",
      "number": 1,
      "title": "Basics",
      "status": "published",
      "units": [
        { "id": "unit-01", "number": 1, "title": "Greetings", "status": "ready" },
        { "id": "unit-02", "number": 2, "title": "Pronouns" },
        { "id": "unit-03", "number": 3, "title": "Drafty", "status": "draft" }
      ]
    },
    { "id": "section-02", "number": 2, "title": "Later", "status": "coming-soon", "units": [] }
  ]
}"#;

pub const WORDS: &str = r#"words:
  unit-01:
    - { si: "ආයුබෝවන්", en: "hello", translit: "ayubowan" }
    - { si: "ස්තුතියි", en: "thank you", translit: "sthuthiyi" }
  unit-02:
    - { si: "මම", en: "I", translit: "mama" }
    - { si: "ඔයා", en: "you", translit: "oya" }
    - { si: "ඔහු", en: "he", translit: "ohu" }
    - { si: "ඇය", en: "she", translit: "eya" }
  unit-03:
    - { si: "නම", en: "name", translit: "nama" }
"#;

pub const SENTENCES: &str = r#"section-01:
  - id: unit-02
    name: "Pronouns"
    sentences:
      - text: "I you"
        tokens: [mama, oya]
      - text: "He she"
        tokens: [ohu, eya]
        minUnit: 9
"#;

pub const MANIFEST: &str = r#"{
  "lessons": [
    { "lessonId": "lesson-01", "sectionId": "section-01-basics", "unitId": "unit-02-pronouns",
      "lessonTitle": "Me and you", "path": "./lessons/section-01/unit-02/lesson-01.md" },
    { "lessonId": "lesson-02", "sectionId": "section-01-basics", "unitId": "unit-02-pronouns",
      "lessonTitle": "Him and her", "path": "lessons/section-01/unit-02/lesson-02.md" }
  ]
}"#;

pub const PRONOUN_LESSON: &str = r#"title: Me and you
vocab:
  - { si: "මම", en: "I", translit: "mama" }
  - { si: "ඔයා", en: "you", translit: "oya" }
  - { si: "ඔහු", en: "he", translit: "ohu" }
  - { si: "ඇය", en: "she", translit: "eya" }
exercises:
  - translate
"#;

pub const SECOND_LESSON: &str = r#"vocab:
  - { si: "අපි", en: "we", translit: "api" }
"#;

pub const COURSE_INDEX: &str = r#"{
  "sections": [{
    "id": "section-01",
    "units": [{
      "id": "unit-02",
      "skills": [{
        "skillId": "pronouns",
        "levels": [{
          "levelId": "l1",
          "lessonCount": 3,
          "lessons": ["lesson-01", { "id": "lesson-02", "type": "review" }]
        }]
      }]
    }]
  }]
}"#;

pub const UNIT_LESSONS: &str = r#"{"lessons": [{"id": "lesson-01", "title": "Me and you"}]}"#;

/// Write the fixture course under `root`.
pub fn write_course(root: &Path) {
    let files = [
        ("course.map.json", COURSE_MAP),
        ("sections/section-01/words.yaml", WORDS),
        ("sections/section-01/sentences.yaml", SENTENCES),
        ("lesson.manifest.json", MANIFEST),
        ("lessons/section-01/unit-02/lesson-01.md", PRONOUN_LESSON),
        ("lessons/section-01/unit-02/lesson-02.md", SECOND_LESSON),
        ("data/course.index.json", COURSE_INDEX),
        ("data/unit-02.lessons.json", UNIT_LESSONS),
    ];
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        std::fs::write(full_path, content).expect("Failed to write fixture");
    }
}

/// The four pronouns as request vocab.
pub fn pronoun_vocab() -> Value {
    json!([
        { "si": "මම", "en": "I", "translit": "mama" },
        { "si": "ඔයා", "en": "you", "translit": "oya" },
        { "si": "ඔහු", "en": "he", "translit": "ohu" },
        { "si": "ඇය", "en": "she", "translit": "eya" }
    ])
}

/// A lesson context that resolves through the manifest.
pub fn manifest_context(lesson_id: &str) -> Value {
    json!({ "meta": { "lessonId": lesson_id, "unitNumber": 2 } })
}

/// A lesson context naming its lesson source directly.
pub fn path_context(path: &str) -> Value {
    json!({ "detail": { "lessonPath": path } })
}

pub fn dialogue_config() -> Value {
    json!({
        "prompt": "Greet your tutor",
        "turns": [
            { "type": "statement", "text": "ආයුබෝවන්!", "speaker": "Nimal" },
            {
                "type": "choice",
                "options": [
                    { "label": "ආයුබෝවන්", "value": "ayubowan", "isCorrect": true },
                    { "label": "බයි", "followUp": { "text": "That means goodbye." } }
                ]
            }
        ]
    })
}

pub fn fill_blank_config() -> Value {
    json!({
        "prompt": "Complete the sentence",
        "sentence": { "before": "මම", "after": "." },
        "choices": ["ඔයා", "ගෙදර"],
        "answers": ["ගෙදර"]
    })
}
