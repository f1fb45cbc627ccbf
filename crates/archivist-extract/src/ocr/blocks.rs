//! Managed-OCR block graph reconstruction.
//!
//! Managed OCR providers (modeled on AWS Textract, grounded on
//! `aws_textract_service.py`'s `_extract_structured_text_from_page` /
//! `_extract_table_structure` / `_extract_form_structure`) return a flat
//! list of blocks (PAGE/LINE/WORD/TABLE/CELL/KEY_VALUE_SET) linked by
//! `Relationships` (CHILD, VALUE). Per spec §9's redesign flag for "deep
//! relationship chains", this is represented as an arena of blocks plus
//! `id -> block` / `id -> children` index maps built in two passes: read
//! everything, then resolve relationships. No block ever holds a direct
//! reference to another.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    Page,
    Line,
    Word,
    Table,
    Cell,
    KeyValueSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Key,
    Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub block_type: BlockType,
    pub text: Option<String>,
    pub page: u32,
    pub row_index: Option<u32>,
    pub column_index: Option<u32>,
    pub entity_types: Vec<EntityType>,
    /// ids of blocks this block contains (CHILD relationship).
    pub child_ids: Vec<String>,
    /// ids of VALUE blocks associated with a KEY block (VALUE relationship).
    pub value_ids: Vec<String>,
    /// top-left Y coordinate as a fraction of page height, used to order
    /// lines top-to-bottom when no table/form structure applies.
    pub top: f32,
}

/// Arena of blocks plus the index maps described above. Built once per
/// document/page from the provider's raw block list, then queried by the
/// reconstruction functions below.
pub struct BlockGraph {
    by_id: HashMap<String, Block>,
}

impl BlockGraph {
    pub fn new(blocks: Vec<Block>) -> Self {
        let by_id = blocks.into_iter().map(|b| (b.id.clone(), b)).collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.by_id.get(id)
    }

    pub fn of_type(&self, ty: BlockType) -> Vec<&Block> {
        let mut v: Vec<&Block> = self
            .by_id
            .values()
            .filter(|b| b.block_type == ty)
            .collect();
        v.sort_by(|a, b| a.id.cmp(&b.id));
        v
    }

    fn word_text(&self, ids: &[String]) -> String {
        let mut words: Vec<&Block> = ids.iter().filter_map(|id| self.by_id.get(id)).collect();
        words.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(std::cmp::Ordering::Equal));
        words
            .iter()
            .filter_map(|b| b.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Reconstruct every table as "TABLE k:\n<pipe-joined rows>" (spec
    /// §4.4 "Structured OCR output").
    pub fn reconstruct_tables(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (k, table) in self.of_type(BlockType::Table).into_iter().enumerate() {
            let mut cells: Vec<&Block> = table
                .child_ids
                .iter()
                .filter_map(|id| self.by_id.get(id))
                .filter(|b| b.block_type == BlockType::Cell)
                .collect();
            cells.sort_by_key(|c| (c.row_index.unwrap_or(0), c.column_index.unwrap_or(0)));

            let mut rows: Vec<Vec<String>> = Vec::new();
            let mut current_row = None;
            for cell in cells {
                let row_idx = cell.row_index.unwrap_or(0);
                if current_row != Some(row_idx) {
                    rows.push(Vec::new());
                    current_row = Some(row_idx);
                }
                rows.last_mut()
                    .unwrap()
                    .push(self.word_text(&cell.child_ids));
            }
            let body = rows
                .into_iter()
                .map(|r| r.join(" | "))
                .collect::<Vec<_>>()
                .join("\n");
            out.push(format!("TABLE {}:\n{}", k + 1, body));
        }
        out
    }

    /// Reconstruct every KEY/VALUE pair as "FORM DATA:\nkey: value" lines
    /// (spec §4.4).
    pub fn reconstruct_forms(&self) -> Option<String> {
        let key_value_sets = self.of_type(BlockType::KeyValueSet);
        let keys: Vec<&Block> = key_value_sets
            .iter()
            .filter(|b| b.entity_types.contains(&EntityType::Key))
            .copied()
            .collect();
        if keys.is_empty() {
            return None;
        }
        let mut lines = Vec::new();
        for key in keys {
            let key_text = self.word_text(&key.child_ids);
            let value_text = key
                .value_ids
                .first()
                .and_then(|vid| self.by_id.get(vid))
                .map(|v| self.word_text(&v.child_ids))
                .unwrap_or_default();
            lines.push(format!("{}: {}", key_text.trim(), value_text.trim()));
        }
        Some(format!("FORM DATA:\n{}", lines.join("\n")))
    }

    /// Plain top-to-bottom lines, grouped by Y-coordinate tolerance of
    /// roughly 0.02 of page height when only WORD blocks are present
    /// (spec §4.4 "Plain lines").
    pub fn reconstruct_plain_lines(&self) -> String {
        let mut lines = self.of_type(BlockType::Line);
        if !lines.is_empty() {
            lines.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(std::cmp::Ordering::Equal));
            return lines
                .iter()
                .filter_map(|l| l.text.clone())
                .collect::<Vec<_>>()
                .join("\n");
        }

        const TOLERANCE: f32 = 0.02;
        let mut words = self.of_type(BlockType::Word);
        words.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(std::cmp::Ordering::Equal));
        let mut grouped: Vec<Vec<&Block>> = Vec::new();
        for word in words {
            match grouped.last_mut() {
                Some(group) if (group[0].top - word.top).abs() <= TOLERANCE => group.push(word),
                _ => grouped.push(vec![word]),
            }
        }
        grouped
            .into_iter()
            .map(|group| {
                group
                    .iter()
                    .filter_map(|w| w.text.as_deref())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Full page text assembling tables, forms, then plain lines, in that
    /// order (spec §4.4 "Structured OCR output").
    pub fn reconstruct_page_text(&self) -> String {
        let mut sections = Vec::new();
        sections.extend(self.reconstruct_tables());
        if let Some(form) = self.reconstruct_forms() {
            sections.push(form);
        }
        let plain = self.reconstruct_plain_lines();
        if !plain.is_empty() {
            sections.push(plain);
        }
        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: &str, text: &str, top: f32) -> Block {
        Block {
            id: id.into(),
            block_type: BlockType::Word,
            text: Some(text.into()),
            page: 1,
            row_index: None,
            column_index: None,
            entity_types: vec![],
            child_ids: vec![],
            value_ids: vec![],
            top,
        }
    }

    #[test]
    fn reconstructs_table_rows_sorted_by_row_and_column() {
        let mut blocks = vec![
            word("w1", "Name", 0.0),
            word("w2", "Age", 0.0),
            word("w3", "Alice", 0.1),
            word("w4", "30", 0.1),
        ];
        let mut cell = |id: &str, row: u32, col: u32, child: &str| Block {
            id: id.into(),
            block_type: BlockType::Cell,
            text: None,
            page: 1,
            row_index: Some(row),
            column_index: Some(col),
            entity_types: vec![],
            child_ids: vec![child.into()],
            value_ids: vec![],
            top: row as f32,
        };
        blocks.push(cell("c1", 0, 0, "w1"));
        blocks.push(cell("c2", 0, 1, "w2"));
        blocks.push(cell("c3", 1, 0, "w3"));
        blocks.push(cell("c4", 1, 1, "w4"));
        blocks.push(Block {
            id: "t1".into(),
            block_type: BlockType::Table,
            text: None,
            page: 1,
            row_index: None,
            column_index: None,
            entity_types: vec![],
            child_ids: vec!["c1".into(), "c2".into(), "c3".into(), "c4".into()],
            value_ids: vec![],
            top: 0.0,
        });

        let graph = BlockGraph::new(blocks);
        let tables = graph.reconstruct_tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0], "TABLE 1:\nName | Age\nAlice | 30");
    }

    #[test]
    fn reconstructs_key_value_pairs() {
        let blocks = vec![
            Block {
                id: "k1".into(),
                block_type: BlockType::KeyValueSet,
                text: None,
                page: 1,
                row_index: None,
                column_index: None,
                entity_types: vec![EntityType::Key],
                child_ids: vec!["kw1".into()],
                value_ids: vec!["v1".into()],
                top: 0.0,
            },
            word("kw1", "Total:", 0.0),
            Block {
                id: "v1".into(),
                block_type: BlockType::KeyValueSet,
                text: None,
                page: 1,
                row_index: None,
                column_index: None,
                entity_types: vec![EntityType::Value],
                child_ids: vec!["vw1".into()],
                value_ids: vec![],
                top: 0.0,
            },
            word("vw1", "$42.00", 0.0),
        ];
        let graph = BlockGraph::new(blocks);
        assert_eq!(
            graph.reconstruct_forms().unwrap(),
            "FORM DATA:\nTotal:: $42.00"
        );
    }
}
