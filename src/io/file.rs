use crate::model::Board;
use std::path::Path;

/// Save a board to a JSON file.
pub fn save_board(board: &Board, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(board).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())
}

/// Load a board from a JSON file.
pub fn load_board(path: &Path) -> Result<Board, String> {
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}
