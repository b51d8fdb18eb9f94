//! Instructions and output schema handed to the analysis agent, in the
//! dashboard's language.

use adlens_core::config::AnalysisLocale;
use serde_json::{json, Value};

pub fn instructions(locale: AnalysisLocale) -> &'static str {
    match locale {
        AnalysisLocale::ZhTw => INSTRUCTIONS_ZH_TW,
        AnalysisLocale::En => INSTRUCTIONS_EN,
    }
}

/// Shape the agent should fill in. Keys are identical across locales; only
/// the placeholder descriptions change.
pub fn output_format(locale: AnalysisLocale) -> Value {
    match locale {
        AnalysisLocale::ZhTw => output_format_zh_tw(),
        AnalysisLocale::En => output_format_en(),
    }
}

const INSTRUCTIONS_ZH_TW: &str = "\
請分析以下廣告的視覺元素、文案和受眾設定。

## 重要：每個廣告可能包含多張輪播圖
- 請將同一廣告的所有輪播圖「綜合分析」
- 不要把每張圖當成獨立素材

## 分析要求

1. **視覺分析**（針對輪播組合整體，需詳細評估）：
   - 整體構圖和視覺流動（評分 1-10）
   - 色彩搭配的和諧度（主色調、對比、品牌一致性）
   - 吸引力評分（1-10）：第一眼吸睛程度
   - 文字排版和易讀性
   - 產品展示方式
   - 輪播圖之間的關聯性和故事性
   - 視覺成功因素（為什麼有效）
   - 視覺待改善項目（哪些地方可以更好）
   - 視覺優化建議（具體改進方向）

2. **文案分析**（需詳細評估）：
   - 語調和風格：專業、親切、幽默、急迫感...
   - 情感觸發點：FOMO、社會認同、獨特性、稀缺性...
   - CTA 有效性：
     * 是否明確告知下一步行動
     * 用詞是否有動力（立即、限時、免費...）
     * 是否減少購買阻力
   - CTA 評分 (1-10)：根據明確性和動力評分
   - 整體評分 (1-10)：根據清晰度、說服力、行動呼籲強度綜合評分
   - 文案成功因素（為什麼這個文案有效）
   - 文案待改善項目（哪些地方可以更好）
   - 文案優化建議（具體改寫方向或範例）

3. **受眾分析**（分析 targeting 設定）：
   - 年齡範圍是否合適（太廣或太窄）
   - 性別設定是否合理
   - 地區設定是否精準
   - 興趣標籤的相關性和精準度
   - 自訂受眾/類似受眾的品質評估
   - 受眾與產品/文案的匹配度

   評估標準：
   - 興趣標籤數量：5-15 個最佳，超過 20 個可能過於分散
   - Lookalike 受眾：檢查來源品質（加入購物車 > 瀏覽內容）
   - 年齡範圍：過廣（18+）可能浪費預算，建議根據產品屬性縮窄

4. **成效歸因**：結合成效數據（CTR、ROAS、購買數）和受眾設定，判斷：
   - 跨維度成功因素（視覺+文案+受眾的綜合優勢）
   - 跨維度失敗因素（哪些維度拖累整體表現）
   - 優先改善建議（最能提升成效的優化方向）

請以結構化方式輸出分析結果。
";

const INSTRUCTIONS_EN: &str = "\
Analyse the visuals, copy and targeting of each ad below.

Each ad may contain several carousel images. Assess the carousel as a whole;
do not treat individual images as separate creatives.

1. Visual analysis (whole carousel)
   - composition and visual flow (score 1-10)
   - colour harmony: dominant colours, contrast, brand consistency
   - attractiveness at first glance (score 1-10)
   - text layout and readability
   - product presentation
   - narrative between carousel cards
   - success factors, weaknesses, concrete improvements

2. Copy analysis
   - tone: professional, friendly, playful, urgent
   - emotional triggers: FOMO, social proof, exclusivity, scarcity
   - call to action: is the next step explicit, is the wording motivating,
     does it lower purchase friction (CTA score 1-10)
   - overall score 1-10 for clarity, persuasion and CTA strength
   - strengths, weaknesses, suggested rewrites

3. Targeting analysis
   - age range breadth, gender, locations
   - interest tags: relevance and precision (5-15 is healthy, over 20 is diffuse)
   - custom and lookalike audiences: source quality (add-to-cart beats view-content)
   - fit between audience, product and copy

4. Performance attribution
   Combine CTR, ROAS and purchases with the findings above to name cross-cutting
   success factors, failure factors and the highest-priority improvements.

Return the result in the structure given by output_format.
";

fn output_format_zh_tw() -> Value {
    json!({
        "per_ad": {
            "ad_id": "廣告 ID",
            "adset_id": "廣告組 ID",
            "vision_analysis": {
                "composition": "整體構圖描述",
                "composition_score": "構圖評分 1-10",
                "color_scheme": ["主色調"],
                "color_harmony": "色彩和諧度評估",
                "brand_consistency": "品牌一致性評估",
                "attractiveness_score": "吸引力評分 1-10",
                "text_detected": "圖片文字內容",
                "text_readability": "文字易讀性評估",
                "product_presentation": "產品呈現方式",
                "carousel_narrative": "輪播故事性描述（如有多張圖）",
                "success_factors": ["視覺成功因素"],
                "failure_factors": ["視覺待改善項目"],
                "improvement_suggestions": ["視覺優化建議"]
            },
            "copy_analysis": {
                "tone": "語調（專業/親切/幽默/急迫）",
                "emotional_triggers": ["情感觸發點"],
                "call_to_action": "CTA 內容",
                "cta_effectiveness": "CTA 有效性評估",
                "cta_score": "CTA 評分 1-10",
                "overall_score": "1-10 評分",
                "strengths": ["文案成功因素"],
                "weaknesses": ["文案待改善項目"],
                "suggested_improvements": ["文案優化建議"]
            },
            "targeting_analysis": {
                "age_assessment": "年齡範圍評估（是否適合產品）",
                "gender_assessment": "性別設定評估",
                "location_assessment": "地區設定評估",
                "interests_assessment": "興趣標籤評估（數量、相關性、精準度）",
                "custom_audience_assessment": "自訂受眾/Lookalike 評估",
                "audience_product_fit": "受眾與產品匹配度",
                "strengths": ["受眾設定優點"],
                "weaknesses": ["受眾設定缺點"],
                "suggestions": ["受眾優化建議"],
                "score": "1-10 評分"
            }
        },
        "overall_success_factors": ["跨維度成功因素"],
        "overall_failure_factors": ["跨維度失敗因素"],
        "priority_improvements": ["優先改善建議"],
        "summary": {
            "best_performing": "表現最佳的廣告 ID",
            "best_targeting": "受眾設定最佳的廣告組 ID",
            "key_insights": ["關鍵洞察"],
            "targeting_insights": ["受眾相關洞察"],
            "next_week_recommendations": ["下週建議"]
        }
    })
}

fn output_format_en() -> Value {
    json!({
        "per_ad": {
            "ad_id": "ad id",
            "adset_id": "ad set id",
            "vision_analysis": {
                "composition": "overall composition",
                "composition_score": "1-10",
                "color_scheme": ["dominant colours"],
                "color_harmony": "colour harmony assessment",
                "brand_consistency": "brand consistency assessment",
                "attractiveness_score": "1-10",
                "text_detected": "text found in the images",
                "text_readability": "readability assessment",
                "product_presentation": "how the product is shown",
                "carousel_narrative": "story across carousel cards",
                "success_factors": ["visual strengths"],
                "failure_factors": ["visual weaknesses"],
                "improvement_suggestions": ["visual improvements"]
            },
            "copy_analysis": {
                "tone": "professional / friendly / playful / urgent",
                "emotional_triggers": ["triggers"],
                "call_to_action": "CTA text",
                "cta_effectiveness": "CTA assessment",
                "cta_score": "1-10",
                "overall_score": "1-10",
                "strengths": ["copy strengths"],
                "weaknesses": ["copy weaknesses"],
                "suggested_improvements": ["rewrites"]
            },
            "targeting_analysis": {
                "age_assessment": "age range fit",
                "gender_assessment": "gender setting",
                "location_assessment": "location setting",
                "interests_assessment": "interest tag count, relevance, precision",
                "custom_audience_assessment": "custom and lookalike audiences",
                "audience_product_fit": "audience to product fit",
                "strengths": ["targeting strengths"],
                "weaknesses": ["targeting weaknesses"],
                "suggestions": ["targeting improvements"],
                "score": "1-10"
            }
        },
        "overall_success_factors": ["cross-cutting success factors"],
        "overall_failure_factors": ["cross-cutting failure factors"],
        "priority_improvements": ["highest-priority improvements"],
        "summary": {
            "best_performing": "ad id",
            "best_targeting": "ad set id",
            "key_insights": ["insights"],
            "targeting_insights": ["targeting insights"],
            "next_week_recommendations": ["recommendations"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_paths(value: &Value, prefix: &str, out: &mut Vec<String>) {
        if let Value::Object(map) = value {
            for (k, v) in map {
                let path = format!("{prefix}/{k}");
                key_paths(v, &path, out);
                out.push(path);
            }
        }
    }

    #[test]
    fn test_default_prompt_is_zh_tw() {
        let text = instructions(AnalysisLocale::default());
        assert!(text.starts_with("請分析以下廣告"));
        let format = output_format(AnalysisLocale::default());
        assert_eq!(format["per_ad"]["ad_id"], "廣告 ID");
    }

    #[test]
    fn test_locales_share_schema() {
        let mut zh = Vec::new();
        let mut en = Vec::new();
        key_paths(&output_format(AnalysisLocale::ZhTw), "", &mut zh);
        key_paths(&output_format(AnalysisLocale::En), "", &mut en);
        zh.sort();
        en.sort();
        assert_eq!(zh, en);
        assert!(instructions(AnalysisLocale::En).starts_with("Analyse"));
    }
}
