use serde_json::{Value as JsonValue, json};

use crate::models::generation::GenerationInput;

pub const STORY_SCHEMA_NAME: &str = "emotional_story";
pub const METADATA_SCHEMA_NAME: &str = "lp_metadata";

pub fn build_story_prompt(input: &GenerationInput) -> String {
    format!(
        r#"<role>新聞広告のエモーショナルコピーを生み出す天才コピーライター兼短編作家。読者の心の琴線に触れ、涙を誘う物語とコピーを紡ぐ。</role>

<task>
商品と顧客像から、心に残るエモーショナルな短編小説を執筆し、新聞広告に使えるキャッチコピーを生成する。
</task>

<input>
- 商品名: {product_name}
- 商品カテゴリ: {product_category}
- ブランドイメージ: {brand_images}
- ターゲット顧客像: {target_user_image}
</input>

<story_guidelines>
- 読者が自分自身や大切な人を重ねられる普遍的な物語
- 日常の何気ない瞬間に宿る、忘れていた大切なものに気づく瞬間
- 親子、夫婦、友人など人と人との絆を描く
- 商品は物語の中で自然に登場し、人生の転機や気づきのきっかけとなる
- 最後に静かな余韻と希望を残す
- 「人間交差点」「深夜食堂」のような情緒
</story_guidelines>

<copy_guidelines>
- 短く、印象的で、声に出して読みたくなる言葉
- 商品名を直接使わず、感情や情景で商品を想起させる
- 読んだ人が立ち止まって考えたくなるような問いかけや気づき
- 新聞の見開き広告に大きく載せても映える言葉
</copy_guidelines>

<format>
- 日本語で執筆
- 舞台は日本、主人公は日本人
- 400〜600文字
- 3〜4段落に分け、段落間は空行で区切る
- 会話文（カギカッコ「」）を効果的に使う
</format>

<output>
1. novel: 短編小説本文（読者の涙を誘う物語）
2. title: 物語のタイトル（短く印象的に）
3. theProtagonistsLastWords: 主人公の心の声または最後のセリフ（物語の核心となる一言）
4. shortPoemsInspiredByTheStory: 広告コピー向け3行短詩（句点「。」で区切る。それぞれ独立したキャッチコピーとして使える）
</output>"#,
        product_name = input.product_name,
        product_category = input.product_category,
        brand_images = input.brand_images.join(", "),
        target_user_image = input.target_user_image,
    )
}

pub struct MetadataPromptInput<'a> {
    pub product_name: &'a str,
    pub product_category: &'a str,
    pub target_user_image: &'a str,
    pub brand_images: &'a [String],
    pub selected_copies: &'a [String],
    pub story: &'a str,
}

pub fn build_metadata_prompt(input: &MetadataPromptInput<'_>) -> String {
    let copies = input
        .selected_copies
        .iter()
        .enumerate()
        .map(|(i, copy)| format!("{}. {}", i + 1, copy))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
あなたはランディングページのコピーライターです。
以下の情報を元に、魅力的なLP用のメタデータを生成してください。

商品情報:
- 商品名: {product_name}
- カテゴリ: {product_category}
- ターゲット: {target_user_image}
- ブランドイメージ: {brand_images}

選択されたコピー候補:
{copies}

元のストーリー:
{story}

生成ガイドライン:
1. mainCopy: 選択されたコピーの中から最も印象的なものを選択
2. subCopy: ターゲットとブランドイメージを反映した短い副題（例：「都心で輝く、あなたのための一杯」）
3. ctaText: 行動を促す短い文言（例：「今すぐ体験」「詳しく見る」「無料で試す」）
4. ctaUrl: '#' を設定
5. subDescription: ターゲットと価値を含む簡潔な説明
6. ogDescription: SNSでシェアされた時に表示される魅力的な説明文
7. formattedStory: 元のストーリーに適切な改行を入れて、読みやすく余韻のある形に整形。詩的な表現を活かす。
   - 「。」の後には2つの改行を入れる
   - 感情的な部分や間を持たせたい部分にも改行を追加
   - 3〜4文ごとに段落を作る
8. brandMessage: ブランドの本質を表す短く印象的な一言

ターゲットユーザーの心に響く、感情的で魅力的な表現を心がけてください。
"#,
        product_name = input.product_name,
        product_category = input.product_category,
        target_user_image = input.target_user_image,
        brand_images = input.brand_images.join(", "),
        copies = copies,
        story = input.story,
    )
}

pub fn story_schema() -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "novel": {
                "type": "string",
                "description": "段落間は2つの改行文字(\\n\\n)で区切ること"
            },
            "title": { "type": "string" },
            "theProtagonistsLastWords": { "type": "string" },
            "shortPoemsInspiredByTheStory": {
                "type": "string",
                "description": "日本語の句点「。」で区切られた3行短詩"
            }
        },
        "required": [
            "novel",
            "title",
            "theProtagonistsLastWords",
            "shortPoemsInspiredByTheStory"
        ],
        "additionalProperties": false
    })
}

pub fn metadata_schema() -> JsonValue {
    let field = |description: &str| json!({ "type": "string", "description": description });

    json!({
        "type": "object",
        "properties": {
            "mainCopy": field("メインキャッチコピー（選択されたコピーから）"),
            "subCopy": field("サブキャッチコピー（ブランドや価値を短く表現）"),
            "ctaText": field("CTAボタンのテキスト（行動を促す短い文言）"),
            "ctaUrl": field("CTAボタンのリンク先URL"),
            "subDescription": field("商品の簡潔な説明（ターゲットと価値を含む）"),
            "ogDescription": field("OGP用の説明文（SNSシェア時の説明）"),
            "formattedStory": field("整形されたユーザーストーリー（改行と余韻を含む）"),
            "brandMessage": field("ブランドメッセージ（短い印象的な一言）")
        },
        "required": [
            "mainCopy",
            "subCopy",
            "ctaText",
            "ctaUrl",
            "subDescription",
            "ogDescription",
            "formattedStory",
            "brandMessage"
        ],
        "additionalProperties": false
    })
}
