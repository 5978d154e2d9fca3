use emocopy_lp::renderer::{
    Placeholder, RenderContext, TemplateRenderer, build_copy_buttons, escape_html,
};

fn context() -> RenderContext {
    RenderContext {
        product_name: "朝のコーヒー".to_string(),
        product_category: "飲料".to_string(),
        main_copy: "おはよう、を届ける".to_string(),
        target_user_image: "忙しい母親".to_string(),
        primary_color: "#0b0b0b".to_string(),
        font_family: "Noto Sans JP".to_string(),
        ..RenderContext::default()
    }
}

/// Test: Every recognized placeholder is substituted
#[test]
fn test_all_placeholders_are_replaced() {
    let template = Placeholder::ALL
        .iter()
        .map(Placeholder::token)
        .collect::<Vec<_>>()
        .join("|");

    let rendered = TemplateRenderer::new(&template).render(&context());

    assert!(!rendered.contains("{{"), "Unreplaced token in {}", rendered);
    assert!(rendered.starts_with("朝のコーヒー|飲料|おはよう、を届ける|"));
}

/// Test: Values are escaped, so markup in copy never reaches the page
#[test]
fn test_values_are_html_escaped() {
    let ctx = RenderContext {
        main_copy: r#"<script>alert("x")</script>"#.to_string(),
        ..context()
    };

    let rendered = TemplateRenderer::new("<h1>{{main_copy}}</h1>").render(&ctx);

    assert_eq!(
        rendered,
        "<h1>&lt;script&gt;alert(&quot;x&quot;)&lt;&#x2F;script&gt;</h1>"
    );
}

/// Test: Every field other than copy_buttons is emitted escaped
#[test]
fn test_every_text_field_is_escaped() {
    let hostile = r#"<>&"'/"#.to_string();
    let ctx = RenderContext {
        product_name: hostile.clone(),
        product_category: hostile.clone(),
        main_copy: hostile.clone(),
        sub_copy: hostile.clone(),
        story: hostile.clone(),
        cta_text: hostile.clone(),
        cta_url: hostile.clone(),
        copy_buttons: String::new(),
        target_user_image: hostile.clone(),
        sub_description: hostile.clone(),
        og_description: hostile.clone(),
        primary_color: hostile.clone(),
        font_family: hostile,
    };

    for placeholder in Placeholder::ALL.into_iter().filter(|p| !p.is_markup()) {
        let rendered = TemplateRenderer::new(&placeholder.token()).render(&ctx);

        assert_eq!(
            rendered,
            "&lt;&gt;&amp;&quot;&#x27;&#x2F;",
            "{} was not escaped",
            placeholder.name()
        );
    }
}

/// Test: copy_buttons is the one value inserted verbatim
#[test]
fn test_copy_buttons_inserted_verbatim() {
    let ctx = RenderContext {
        copy_buttons: r#"<button class="tag">a</button>"#.to_string(),
        ..context()
    };

    let rendered = TemplateRenderer::new("<div>{{copy_buttons}}</div>").render(&ctx);

    assert_eq!(rendered, r#"<div><button class="tag">a</button></div>"#);
}

/// Test: target_user reads the target user description
#[test]
fn test_target_user_placeholder() {
    let rendered = TemplateRenderer::new("{{target_user}}").render(&context());

    assert_eq!(rendered, "忙しい母親");
}

/// Test: Repeated placeholders are all replaced
#[test]
fn test_repeated_placeholders() {
    let rendered =
        TemplateRenderer::new("{{primary_color}};{{primary_color}};{{primary_color}}").render(&context());

    assert_eq!(rendered, "#0b0b0b;#0b0b0b;#0b0b0b");
}

/// Test: Unknown placeholders and malformed braces pass through untouched
#[test]
fn test_unknown_placeholders_left_unchanged() {
    let template = "{{unknown}} {{ main_copy }} {main_copy} {{MAIN_COPY}}";

    let rendered = TemplateRenderer::new(template).render(&context());

    assert_eq!(rendered, template);
}

/// Test: Substituted values are not scanned again for placeholders
#[test]
fn test_substituted_text_is_not_rescanned() {
    let ctx = RenderContext {
        copy_buttons: "{{product_name}}".to_string(),
        story: "{{main_copy}}".to_string(),
        ..context()
    };

    let rendered = TemplateRenderer::new("{{copy_buttons}}|{{story}}").render(&ctx);

    assert_eq!(rendered, "{{product_name}}|{{main_copy}}");
}

/// Test: A template without placeholders is returned as-is
#[test]
fn test_template_without_placeholders() {
    let template = "<html><body><p>静かな朝</p></body></html>";

    assert_eq!(TemplateRenderer::new(template).render(&context()), template);
}

#[test]
fn test_escape_html_covers_all_special_characters() {
    assert_eq!(
        escape_html(r#"&<>"'/"#),
        "&amp;&lt;&gt;&quot;&#x27;&#x2F;"
    );
    assert_eq!(escape_html("普通の文章"), "普通の文章");
    assert_eq!(escape_html(""), "");
}

/// Test: Escaping is applied once; existing entities are escaped again
#[test]
fn test_escape_html_is_not_idempotent_on_entities() {
    assert_eq!(escape_html("&amp;"), "&amp;amp;");
}

/// Test: Buttons carry the escaped copy and mark only the selected index
#[test]
fn test_build_copy_buttons_marks_selected() {
    let copies = vec!["一杯の余白".to_string(), "<b>Wow</b>".to_string()];

    let markup = build_copy_buttons(&copies, Some(1));
    let lines: Vec<&str> = markup.lines().collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        r#"<button class="tag" aria-pressed="false" data-copy="一杯の余白">一杯の余白</button>"#
    );
    assert_eq!(
        lines[1],
        r#"<button class="tag" aria-pressed="true" data-copy="&lt;b&gt;Wow&lt;&#x2F;b&gt;">&lt;b&gt;Wow&lt;&#x2F;b&gt;</button>"#
    );
}

#[test]
fn test_build_copy_buttons_without_selection() {
    let copies = vec!["a".to_string(), "b".to_string()];

    let markup = build_copy_buttons(&copies, None);

    assert!(!markup.contains(r#"aria-pressed="true""#));
    assert_eq!(markup.matches(r#"aria-pressed="false""#).count(), 2);
}

#[test]
fn test_build_copy_buttons_out_of_range_selection() {
    let copies = vec!["a".to_string()];

    let markup = build_copy_buttons(&copies, Some(5));

    assert!(markup.contains(r#"aria-pressed="false""#));
}

#[test]
fn test_build_copy_buttons_empty() {
    assert_eq!(build_copy_buttons(&[], Some(0)), "");
}

/// Test: Quotes in a copy cannot break out of the data-copy attribute
#[test]
fn test_build_copy_buttons_attribute_safety() {
    let copies = vec![r#"" onclick="alert(1)"#.to_string()];

    let markup = build_copy_buttons(&copies, Some(0));

    assert!(!markup.contains(r#"" onclick"#));
    assert!(markup.contains("&quot; onclick=&quot;alert(1)"));
}

#[test]
fn test_placeholder_names_round_trip() {
    for placeholder in Placeholder::ALL {
        assert_eq!(Placeholder::from_name(placeholder.name()), Some(placeholder));
    }

    assert_eq!(Placeholder::from_name("target_user_image"), None);
    assert!(Placeholder::CopyButtons.is_markup());
    assert!(!Placeholder::Story.is_markup());
}
