//! Plain box-drawn tables for terminal output.

use console::{Alignment, measure_text_width, pad_str, style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
}

impl Justify {
    fn alignment(self) -> Alignment {
        match self {
            Self::Left => Alignment::Left,
            Self::Center => Alignment::Center,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    title: String,
    columns: Vec<(String, Justify)>,
    rows: Vec<Vec<String>>,
    alert: bool,
}

impl Table {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            alert: false,
        }
    }

    /// Render the title in red instead of green.
    pub fn alert(mut self) -> Self {
        self.alert = true;
        self
    }

    pub fn column(mut self, header: impl Into<String>, justify: Justify) -> Self {
        self.columns.push((header.into(), justify));
        self
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| measure_text_width(c))
                    .chain(std::iter::once(measure_text_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rule = |left: &str, mid: &str, right: &str| {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}\n", inner.join(mid))
        };

        let line = |cells: &[String], header: bool| {
            let mut out = String::from("│");
            for (i, (_, justify)) in self.columns.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let padded = pad_str(cell, widths[i], justify.alignment(), None);
                if header {
                    out.push_str(&format!(" {} │", style(padded).bold()));
                } else {
                    out.push_str(&format!(" {padded} │"));
                }
            }
            out.push('\n');
            out
        };

        let title = if self.alert {
            style(&self.title).red().bold()
        } else {
            style(&self.title).green().bold()
        };

        let mut out = format!("\n{title}\n");
        out.push_str(&rule("┌", "┬", "┐"));
        let headers: Vec<String> = self.columns.iter().map(|(h, _)| h.clone()).collect();
        out.push_str(&line(&headers, true));
        out.push_str(&rule("├", "┼", "┤"));
        for row in &self.rows {
            out.push_str(&line(row, false));
        }
        out.push_str(&rule("└", "┴", "┘"));
        out
    }
}

/// Bytes as GiB with two decimals; missing or zero sizes show `0.00 GiB`.
pub fn format_size(size_bytes: Option<u64>) -> String {
    match size_bytes {
        Some(b) if b > 0 => format!("{:.2} GiB", b as f64 / (1024u64.pow(3)) as f64),
        _ => "0.00 GiB".to_string(),
    }
}

pub fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}
