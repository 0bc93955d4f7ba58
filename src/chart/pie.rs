//! Chart generation and rendering for the category breakdown page.
//!
//! The chart is generated as JSON configuration for the ECharts library and
//! rendered with a corresponding HTML container and JavaScript
//! initialization code. The chart never touches the filesystem: the JSON is
//! embedded directly in the page response.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{Label, Orient, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{expense::CategoryTotal, html::HeadElement};

/// The HTML element ID of the chart container (kebab-case).
pub(super) const CHART_CONTAINER_ID: &str = "category-chart";

/// Renders the HTML container the chart is drawn into.
pub(super) fn chart_view() -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div
                id=(CHART_CONTAINER_ID)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// Generates the JavaScript initialization code for the chart.
///
/// Creates a script that initializes the ECharts instance with dark mode
/// support and responsive resizing.
pub(super) fn chart_script(options: &str) -> HeadElement {
    let script_content = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{CHART_CONTAINER_ID}");
            const chart = echarts.init(chartDom);
            const option = {options};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#
    );

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Builds the pie chart of per-category spending.
///
/// Each slice is labelled with the category name and its share of the total
/// spending as a percentage.
pub(super) fn category_pie_chart(totals: &[CategoryTotal]) -> Chart {
    let data = totals
        .iter()
        .map(|category_total| (category_total.total, category_total.category.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Spending by category"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().orient(Orient::Vertical).left("left"))
        .series(
            Pie::new()
                .name("Spending")
                .radius("55%")
                .label(Label::new().show(true).formatter("{b}: {d}%"))
                .data(data),
        )
}
