//! Synthesis from extracted models to generated source text.

use argen::extract::{Field, ModelDescriptor, extract_from_str};
use argen::{Models, SynthError, Synthesizer};
use assert_matches::assert_matches;

const USERS: &str = r#"
    use argen_runtime::ActiveRecord;

    /// +AR
    /// +AR has_many Posts
    /// +AR scope Recent
    #[derive(ActiveRecord, Debug, Default, Clone)]
    pub struct User {
        #[ar(primary_key)]
        pub id: i64,
        #[ar(presence, length(maximum = 3))]
        pub name: String,
    }

    /// +AR
    /// +AR scope Popular
    /// +AR belongs_to User
    #[derive(ActiveRecord, Debug, Default, Clone)]
    pub struct Post {
        pub id: i64,
        pub user_id: i64,
        #[ar(numericality(only_integer, greater_than_or_equal_to = 0))]
        pub votes: i64,
    }
"#;

fn synthesize(source: &str) -> String {
    let models = extract_from_str(source, "models.rs", "models", "+AR").unwrap();
    Synthesizer::standard().synthesize(&models).unwrap()
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` missing from generated source"))
}

mod scenario {
    use super::*;

    #[test]
    fn test_user_surface() {
        let source = synthesize(USERS);
        for construct in [
            "use super::models::*;",
            "static DB: ::argen_runtime::Handle",
            "pub fn use_connection<",
            "pub struct UserRelation",
            "pub fn find(id: i64)",
            "pub fn r#where(",
            "pub fn and(",
            "pub fn create(",
            "pub struct UserParams",
            "pub fn save(&mut self)",
            "pub fn update(",
            "pub fn delete(&self)",
            "pub fn is_valid(&self)",
            "pub fn posts(&self)",
            "pub fn joins_posts(mut self)",
            "pub fn build_post(&self, params: PostParams)",
            "pub fn user(&self)",
        ] {
            position(&source, construct);
        }
    }

    #[test]
    fn test_scope_on_model_and_relation() {
        let source = synthesize(USERS);
        assert_eq!(source.matches("pub fn recent(").count(), 2);
        assert!(source.contains("USER_SCOPES.apply(\"Recent\", Self::new_relation(), args)"));
        assert!(source.contains("USER_SCOPES.apply(\"Recent\", self, args)"));
    }

    #[test]
    fn test_relation_lookups() {
        let source = synthesize(USERS);
        assert!(source.contains("Post::r#where("));
        assert!(source.contains("\"User_id\""));
        assert!(source.contains("\"Post.User_id = User.id\""));
        assert!(source.contains("\"User.id = Post.user_id\""));
    }

    #[test]
    fn test_columns_keep_declaration_order() {
        let source = synthesize(USERS);
        assert!(source.contains(r#"&["id", "name"]"#));
        assert!(source.contains(r#"&["id", "user_id", "votes"]"#));
    }

    #[test]
    fn test_output_is_valid_rust() {
        let source = synthesize(USERS);
        assert!(source.starts_with(argen::synth::BANNER));
        syn::parse_file(&source).unwrap();
    }
}

mod ordering {
    use super::*;

    #[test]
    fn test_directives_follow_annotation_order() {
        let source = synthesize(USERS);
        assert!(position(&source, "pub fn posts(") < position(&source, "pub fn recent("));
        // Post declares its scope before its owner.
        assert!(position(&source, "pub fn popular(") < position(&source, "pub fn user(&self)"));
    }

    #[test]
    fn test_models_follow_source_order() {
        let source = synthesize(USERS);
        assert!(position(&source, "pub struct UserRelation") < position(&source, "pub struct PostRelation"));
    }

    #[test]
    fn test_synthesis_is_idempotent() {
        let models = extract_from_str(USERS, "models.rs", "models", "+AR").unwrap();
        let synthesizer = Synthesizer::standard();
        assert_eq!(
            synthesizer.synthesize(&models).unwrap(),
            synthesizer.synthesize(&models).unwrap()
        );
    }
}

mod failures {
    use super::*;

    fn descriptor(name: &str, fields: Vec<Field>, annotations: &[&str]) -> ModelDescriptor {
        ModelDescriptor {
            package: "models".into(),
            marker: "+AR".into(),
            annotations: annotations.iter().map(|a| a.to_string()).collect(),
            name: name.into(),
            fields,
        }
    }

    #[test]
    fn test_missing_primary_key_aborts_everything() {
        let models = Models::from(vec![
            descriptor("Good", vec![Field::new("id", "i64")], &["+AR"]),
            descriptor("Keyless", vec![Field::new("name", "String")], &["+AR"]),
        ]);
        assert_matches!(
            Synthesizer::standard().synthesize(&models),
            Err(SynthError::MissingPrimaryKey { model }) if model == "Keyless"
        );
    }

    #[test]
    fn test_invalid_names_abort() {
        let models = Models::from(vec![descriptor("Bad Name", vec![Field::new("id", "i64")], &["+AR"])]);
        assert_matches!(
            Synthesizer::standard().synthesize(&models),
            Err(SynthError::InvalidIdentifier { .. })
        );

        let models = Models::from(vec![descriptor(
            "Post",
            vec![Field::new("id", "i64")],
            &["+AR belongs_to User"],
        )]);
        assert_matches!(
            Synthesizer::standard().synthesize(&models),
            Err(SynthError::MissingForeignKey { .. })
        );
    }

    #[test]
    fn test_incomplete_library_aborts() {
        let models = Models::from(vec![descriptor("Tag", vec![Field::new("id", "i64")], &["+AR"])]);
        let library = argen::FragmentLibrary::empty();
        assert_matches!(
            Synthesizer::new(&library).synthesize(&models),
            Err(SynthError::UnknownFragment(name)) if name == "Relation"
        );
    }
}
