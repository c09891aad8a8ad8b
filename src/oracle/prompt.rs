//! Prompt text for the upstream model.

use crate::models::AnalysisRequest;

pub const SYSTEM_PROMPT: &str = "你是一位严谨且通俗易懂的《周易》分析助手。\
结合用户问题与卦象（卦名、卦辞、象辞、爻辞、变爻），给出结构化的中文解读：\n\
- 结论（一句话）\n- 形势分析\n- 建议（行动要点）\n- 注意事项\n\
要求：真实、简洁、避免迷信表达，避免绝对化断语。";

/// The user turn: question plus every piece of hexagram context we have.
pub fn user_prompt(request: &AnalysisRequest) -> String {
    let hx = &request.hexagram;
    let changes = if hx.change_list.is_empty() {
        "无".to_string()
    } else {
        hx.change_list.join(", ")
    };

    format!(
        "问题：{}\n卦象：{}（序号 {}，{}）\n变爻：{}\n卦辞：{}\n象曰：{}\n爻辞：{}",
        request.question,
        hx.name,
        hx.sequence,
        hx.full_name,
        changes,
        hx.judgement,
        hx.image,
        hx.lines.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisHexagram, DEFAULT_MODEL};

    #[test]
    fn user_prompt_lists_context_and_marks_no_changes() {
        let request = AnalysisRequest {
            question: "工作上有什么需要注意的？".to_string(),
            model: DEFAULT_MODEL.to_string(),
            hexagram: AnalysisHexagram {
                name: "乾".to_string(),
                sequence: 1,
                full_name: "乾为天".to_string(),
                judgement: "元亨利贞。".to_string(),
                lines: vec!["初九：潜龙勿用。".to_string(), "九二：见龙在田。".to_string()],
                ..Default::default()
            },
        };

        let prompt = user_prompt(&request);
        assert!(prompt.starts_with("问题：工作上有什么需要注意的？\n"));
        assert!(prompt.contains("卦象：乾（序号 1，乾为天）"));
        assert!(prompt.contains("变爻：无"));
        assert!(prompt.ends_with("爻辞：初九：潜龙勿用。\n九二：见龙在田。"));
    }

    #[test]
    fn user_prompt_joins_changing_lines() {
        let mut request = AnalysisRequest {
            question: "q".to_string(),
            model: DEFAULT_MODEL.to_string(),
            hexagram: AnalysisHexagram::default(),
        };
        request.hexagram.change_list = vec!["初九".to_string(), "六四".to_string()];
        assert!(user_prompt(&request).contains("变爻：初九, 六四"));
    }
}
