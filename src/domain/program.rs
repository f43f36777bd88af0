// ==========================================
// 课表排课系统 - 专业查找表
// ==========================================
// 用途: 表格中的专业名称（本地语言）→ 专业 ID
// 规则: 字符串完全相等，取第一个匹配项，不做模糊匹配
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    #[serde(alias = "name_th")]
    pub name: String,
}

impl Program {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// 专业快照（调用方提供，核心只读）
#[derive(Debug, Clone, Default)]
pub struct ProgramLookup {
    programs: Vec<Program>,
}

impl ProgramLookup {
    pub fn new(programs: Vec<Program>) -> Self {
        Self { programs }
    }

    /// 按名称解析专业 ID
    ///
    /// # 返回
    /// - Some(id): 第一个名称完全相等的专业
    /// - None: 未匹配（调用方回退为 0）
    pub fn resolve(&self, name: &str) -> Option<i64> {
        self.programs.iter().find(|p| p.name == name).map(|p| p.id)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl From<Vec<Program>> for ProgramLookup {
    fn from(programs: Vec<Program>) -> Self {
        Self::new(programs)
    }
}
