//! Shared fixtures for extraction tests.

use leadgen_core::domains::extraction::{
    Company, Contact, ExtractedEntities, NewExtractedData, Person,
};

pub const PAGE_URL: &str = "https://acme.example/about";

pub const PAGE_BODY: &str = r#"
<html><body>
<h1>About Acme Robotics</h1>
<p>Founded in 2012 in Berlin. Our CTO, Jane Doe (jane@acme.example), leads a team of 45.</p>
</body></html>
"#;

pub fn acme_entities() -> ExtractedEntities {
    ExtractedEntities {
        companies: vec![Company {
            name: Some("Acme Robotics".to_string()),
            founded_year: Some(2012),
            industry: Some("Robotics".to_string()),
            revenue: None,
            employees: Some(45),
            locations: vec!["Berlin".to_string()],
            tech_stack: Vec::new(),
        }],
        people: vec![Person {
            full_name: Some("Jane Doe".to_string()),
            job_title: Some("CTO".to_string()),
            contact: Contact {
                email: Some("jane@acme.example".to_string()),
                ..Default::default()
            },
        }],
    }
}

pub fn new_record(url: &str) -> NewExtractedData {
    NewExtractedData::from_entities(url, acme_entities())
}
