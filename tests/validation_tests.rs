use emocopy_lp::models::{
    generation::GenerationInput,
    landing_page::CreatePageRequest,
    provider::Provider,
    validation::{
        ALLOWED_FONTS, validate_color, validate_create_page_request, validate_font_family,
        validate_generation_input,
    },
};
use tokio_test::{assert_err, assert_ok};

fn generation_input() -> GenerationInput {
    GenerationInput {
        provider: Provider::Google,
        product_name: "朝のコーヒー".to_string(),
        product_category: "飲料".to_string(),
        brand_images: vec!["温かい".to_string(), "丁寧".to_string()],
        target_user_image: "忙しい母親".to_string(),
        generation_log_id: None,
    }
}

#[test]
fn test_validate_color_accepts_hex() {
    assert_eq!(validate_color("#ff0000"), "#ff0000");
    assert_eq!(validate_color("#ABC"), "#ABC");
    assert_eq!(validate_color("#0b0B0b"), "#0b0B0b");
}

/// Test: Anything that could escape the CSS context falls back to black
#[test]
fn test_validate_color_rejects_everything_else() {
    for value in [
        "red",
        "#ff00",
        "#ff00000",
        "ff0000",
        "#ggg",
        "",
        "#fff; background:url(x)",
        "#fff\n",
    ] {
        assert_eq!(validate_color(value), "#000000", "input {:?}", value);
    }
}

#[test]
fn test_validate_font_family_allow_list() {
    for font in ALLOWED_FONTS {
        assert_eq!(validate_font_family(font), font);
    }

    assert_eq!(validate_font_family("Comic Sans"), "Noto Sans JP");
    assert_eq!(validate_font_family("serif; color: red"), "Noto Sans JP");
    assert_eq!(validate_font_family("noto sans jp"), "Noto Sans JP");
    assert_eq!(validate_font_family(""), "Noto Sans JP");
}

#[test]
fn test_generation_input_valid() {
    assert_ok!(validate_generation_input(&generation_input()));
}

#[test]
fn test_generation_input_requires_text_fields() {
    let mut input = generation_input();
    input.product_name = "   ".to_string();

    let error = validate_generation_input(&input).unwrap_err();
    assert_eq!(error.to_string(), "productName is required");

    let mut input = generation_input();
    input.target_user_image = String::new();
    assert_err!(validate_generation_input(&input));
}

/// Test: Between one and three brand images, none blank
#[test]
fn test_generation_input_brand_image_bounds() {
    let mut input = generation_input();
    input.brand_images.clear();
    assert_eq!(
        validate_generation_input(&input).unwrap_err().to_string(),
        "brandImages requires at least one entry"
    );

    input.brand_images = vec!["a".into(), "b".into(), "c".into()];
    assert_ok!(validate_generation_input(&input));

    input.brand_images.push("d".into());
    assert_eq!(
        validate_generation_input(&input).unwrap_err().to_string(),
        "brandImages accepts at most 3 entries"
    );

    input.brand_images = vec!["a".into(), " ".into()];
    assert_err!(validate_generation_input(&input));
}

#[test]
fn test_generation_input_deserializes_camel_case() {
    let input: GenerationInput = serde_json::from_str(
        r#"{
            "provider": "openai",
            "productName": "朝のコーヒー",
            "productCategory": "飲料",
            "brandImages": ["温かい"],
            "targetUserImage": "忙しい母親",
            "generationLogId": "abc"
        }"#,
    )
    .unwrap();

    assert_eq!(input.provider, Provider::OpenAi);
    assert_eq!(input.generation_log_id.as_deref(), Some("abc"));
}

#[test]
fn test_create_page_request_validation() {
    let request: CreatePageRequest =
        serde_json::from_str(r#"{"templateId":"newspaper","selectedCopies":["一杯の余白"]}"#)
            .unwrap();
    assert_ok!(validate_create_page_request(&request));
    assert!(request.config.is_none());

    let request: CreatePageRequest =
        serde_json::from_str(r#"{"templateId":"newspaper","selectedCopies":[]}"#).unwrap();
    assert_eq!(
        validate_create_page_request(&request).unwrap_err().to_string(),
        "selectedCopies requires at least one entry"
    );

    let request: CreatePageRequest =
        serde_json::from_str(r#"{"templateId":" ","selectedCopies":["a"]}"#).unwrap();
    assert_err!(validate_create_page_request(&request));
}
