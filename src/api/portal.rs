const MAX_RESULT: u32 = 100;

pub fn list_accounts_endpoint() -> &'static str {
    "/assignment/accounts"
}

pub fn list_roles_endpoint() -> &'static str {
    "/assignment/roles"
}

pub fn list_accounts_query(next_token: Option<&str>) -> Vec<(String, String)> {
    let mut params = vec![("max_result".to_string(), MAX_RESULT.to_string())];
    if let Some(token) = next_token {
        params.push(("next_token".to_string(), token.to_string()));
    }
    params
}

pub fn list_roles_query(account_id: &str, next_token: Option<&str>) -> Vec<(String, String)> {
    let mut params = vec![
        ("account_id".to_string(), account_id.to_string()),
        ("max_result".to_string(), MAX_RESULT.to_string()),
    ];
    if let Some(token) = next_token {
        params.push(("next_token".to_string(), token.to_string()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_query_has_no_token() {
        let params = list_accounts_query(None);
        assert_eq!(params, [("max_result".to_string(), "100".to_string())]);
    }

    #[test]
    fn continuation_query_carries_token() {
        let params = list_accounts_query(Some("abc"));
        assert!(params.contains(&("next_token".to_string(), "abc".to_string())));
    }

    #[test]
    fn role_query_scopes_to_account() {
        let params = list_roles_query("1234567890", None);
        assert!(params.contains(&("account_id".to_string(), "1234567890".to_string())));
    }
}
