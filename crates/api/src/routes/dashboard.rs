use axum::response::Html;

/// 仪表盘页面，图表渲染由页面内的 plotly.js 完成，数据取自 `/api/v1/indicators`
const DASHBOARD_HTML: &str = include_str!("../../assets/dashboard.html");

pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_moving_average_is_disabled_in_request() {
        // 隐藏或清空均线时请求 ma=none，避免多丢弃均线预热行
        assert!(DASHBOARD_HTML.contains(
            r#"params.set("ma", $("ma-on").checked && $("ma").value ? $("ma").value : "none");"#
        ));
        assert!(!DASHBOARD_HTML.contains(r#"if ($("ma").value) params.set("ma""#));
    }

    #[test]
    fn test_non_json_error_body_is_reported() {
        assert!(DASHBOARD_HTML.contains("res.json().catch("));
    }
}
