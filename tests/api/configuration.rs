use mailchimp_subscriber::configuration::get_configuration;
use serde_json::json;

use crate::helpers::subscriber;

#[test]
fn configuration_files_are_loaded() {
    let settings = get_configuration().expect("failed to read configuration");
    assert_eq!(settings.telemetry.name, "mailchimp_subscriber");
    assert_eq!(settings.merge_fields.chunk_length, 230);
}

#[test]
fn configured_chunker_splits_long_values() {
    let settings = get_configuration().expect("failed to read configuration");
    let chunker = settings.merge_fields.chunker();

    let mut subscriber = subscriber("jo@example.com", json!({}), json!({}));
    subscriber.set_merge_field_value_with(&chunker, "BIO", "x".repeat(231), Some(2), None);

    let merge_fields = subscriber.merge_fields();
    assert_eq!(merge_fields["BIO_1"], json!("x".repeat(230)));
    assert_eq!(merge_fields["BIO_2"], json!("x"));
}
