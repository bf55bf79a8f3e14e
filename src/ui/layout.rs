use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

pub struct ThreeBox {
    pub top: Rect,
    pub middle: Rect,
    pub bottom: Rect,
    pub top_inner: Rect,
    pub middle_inner: Rect,
}

/// Header, body and a help footer. The body takes whatever is left.
pub fn three_box_layout(size: Rect, top_height: u16, footer_height: u16) -> ThreeBox {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(top_height),
            Constraint::Min(3),
            Constraint::Length(footer_height),
        ])
        .split(size);

    ThreeBox {
        top: chunks[0],
        middle: chunks[1],
        bottom: chunks[2],
        top_inner: chunks[0].inner(&Margin { horizontal: 2, vertical: 1 }),
        middle_inner: chunks[1].inner(&Margin { horizontal: 2, vertical: 1 }),
    }
}

pub fn centered_rect_abs(width: u16, height: u16, r: Rect) -> Rect {
    let w = width.min(r.width.saturating_sub(2));
    let h = height.min(r.height.saturating_sub(2));
    let x = r.x + (r.width.saturating_sub(w)) / 2;
    let y = r.y + (r.height.saturating_sub(h)) / 2;
    Rect { x, y, width: w, height: h }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_centering_clamps_to_parent() {
        let parent = Rect { x: 0, y: 0, width: 20, height: 10 };
        let r = centered_rect_abs(100, 100, parent);
        assert_eq!((r.width, r.height), (18, 8));
        assert_eq!((r.x, r.y), (1, 1));
    }
}
