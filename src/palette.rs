use std::collections::BTreeMap;

/// Qualitative palette: Plotly, Set1, Pastel1, Set2, Dark2 and Set3, concatenated.
pub const PALETTE: [&str; 56] = [
    // Plotly
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A",
    "#19D3F3", "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
    // Set1
    "rgb(228,26,28)", "rgb(55,126,184)", "rgb(77,175,74)", "rgb(152,78,163)", "rgb(255,127,0)",
    "rgb(255,255,51)", "rgb(166,86,40)", "rgb(247,129,191)", "rgb(153,153,153)",
    // Pastel1
    "rgb(251,180,174)", "rgb(179,205,227)", "rgb(204,235,197)", "rgb(222,203,228)", "rgb(254,217,166)",
    "rgb(255,255,204)", "rgb(229,216,189)", "rgb(253,218,236)", "rgb(242,242,242)",
    // Set2
    "rgb(102,194,165)", "rgb(252,141,98)", "rgb(141,160,203)", "rgb(231,138,195)",
    "rgb(166,216,84)", "rgb(255,217,47)", "rgb(229,196,148)", "rgb(179,179,179)",
    // Dark2
    "rgb(27,158,119)", "rgb(217,95,2)", "rgb(117,112,179)", "rgb(231,41,138)",
    "rgb(102,166,30)", "rgb(230,171,2)", "rgb(166,118,29)", "rgb(102,102,102)",
    // Set3
    "rgb(141,211,199)", "rgb(255,255,179)", "rgb(190,186,218)", "rgb(251,128,114)",
    "rgb(128,177,211)", "rgb(253,180,98)", "rgb(179,222,105)", "rgb(252,205,229)",
    "rgb(217,217,217)", "rgb(188,128,189)", "rgb(204,235,197)", "rgb(255,237,111)",
];

pub fn color_at(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Colour per sub-track label, keyed by the label's rank in sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    colors: BTreeMap<String, &'static str>,
}

impl ColorMap {
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let sorted: std::collections::BTreeSet<&str> = labels.into_iter().collect();
        let colors = sorted
            .into_iter()
            .enumerate()
            .map(|(index, label)| (label.to_string(), color_at(index)))
            .collect();
        Self { colors }
    }

    pub fn color_for(&self, label: &str) -> Option<&'static str> {
        self.colors.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_follow_sorted_order() {
        let map = ColorMap::from_labels(["지역균형", "일반전형", "지역균형"]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.color_for("일반전형"), Some(PALETTE[0]));
        assert_eq!(map.color_for("지역균형"), Some(PALETTE[1]));
        assert_eq!(map.color_for("missing"), None);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(color_at(PALETTE.len()), PALETTE[0]);
        assert_eq!(color_at(PALETTE.len() + 3), PALETTE[3]);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = ColorMap::from_labels(["b", "a", "c"]);
        let b = ColorMap::from_labels(["c", "b", "a"]);
        assert_eq!(a, b);
    }
}
