// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::config::KeywordConfig;
use crate::selector::ChartType;

pub struct TitleGenerator<'a> {
    keywords: &'a KeywordConfig,
}

impl<'a> TitleGenerator<'a> {
    pub fn new(keywords: &'a KeywordConfig) -> Self {
        Self { keywords }
    }

    pub fn title(&self, query_text: &str, suffix: &str) -> String {
        let query = query_text.to_lowercase();
        let domain = self
            .keywords
            .title_domains
            .iter()
            .find(|d| query.contains(d.as_str()))
            .map_or_else(|| "Data".to_string(), |d| capitalise(d));
        format!("{domain} {suffix}")
    }
}

pub fn generate_title(query_text: &str, suffix: &str) -> String {
    let keywords = KeywordConfig::default();
    TitleGenerator::new(&keywords).title(query_text, suffix)
}

pub fn generate_description(chart_type: ChartType, row_count: usize) -> String {
    match chart_type {
        ChartType::Pie => format!("Distribution breakdown showing {row_count} categories"),
        ChartType::Line => {
            format!("Time series analysis showing trends over {row_count} periods")
        }
        ChartType::Scatter => "Scatter plot showing relationship between variables".to_string(),
        ChartType::Bar => format!("Comparative analysis across {row_count} categories"),
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_priority() {
        assert_eq!(
            generate_title("revenue and sales by region", "Distribution"),
            "Sales Distribution"
        );
        assert_eq!(
            generate_title("Top CUSTOMER accounts", ChartType::Bar.title_suffix()),
            "Customer Performance Analysis"
        );
        assert_eq!(
            generate_title("Compare product performance", "Performance Analysis"),
            "Product Performance Analysis"
        );
    }

    #[test]
    fn test_default_domain() {
        assert_eq!(
            generate_title("how many users signed up", ChartType::Line.title_suffix()),
            "Data Trend Analysis"
        );
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            generate_description(ChartType::Pie, 2),
            "Distribution breakdown showing 2 categories"
        );
        assert_eq!(
            generate_description(ChartType::Line, 12),
            "Time series analysis showing trends over 12 periods"
        );
        assert_eq!(
            generate_description(ChartType::Scatter, 99),
            "Scatter plot showing relationship between variables"
        );
        assert_eq!(
            generate_description(ChartType::Bar, 5),
            "Comparative analysis across 5 categories"
        );
    }
}
