use sea_orm::EntityTrait;
use serde_json::json;

use server::entity::instruction;

use crate::common::{MediaCall, TestApp, pdf_payload, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn missing_fields_yield_400_and_persist_nothing() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("creator1", "pass12345", "admin")
            .await;
        let product_id = app.create_product(&token, "Fire Station", "BL-7240").await;

        let bodies = [
            json!({ "title": "Manual", "file": pdf_payload() }),
            json!({ "product": product_id, "file": pdf_payload() }),
            json!({ "product": product_id, "title": "Manual" }),
            json!({}),
        ];

        for body in &bodies {
            let res = app
                .post_with_token(routes::ADMIN_INSTRUCTIONS, body, &token)
                .await;
            assert_eq!(res.status, 400, "body {body}: {}", res.text);
            assert_eq!(res.body["success"], json!(false));
            assert_eq!(
                res.body["message"].as_str().unwrap(),
                "Product, title and file are required"
            );
        }

        let stored = instruction::Entity::find().all(&app.db).await.unwrap();
        assert!(stored.is_empty());
        assert_eq!(app.media.upload_count(), 0);
    }

    #[tokio::test]
    async fn unknown_product_yields_404_before_any_upload() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("creator2", "pass12345", "admin")
            .await;

        let res = app
            .post_with_token(
                routes::ADMIN_INSTRUCTIONS,
                &json!({
                    "product": 999_999,
                    "title": "Manual for nothing",
                    "file": pdf_payload(),
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 404, "{}", res.text);
        assert_eq!(res.body["message"].as_str().unwrap(), "Product not found");
        // The existence check must run before the upload.
        assert_eq!(app.media.upload_count(), 0);
        let stored = instruction::Entity::find().all(&app.db).await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn create_persists_the_adapter_file_descriptor() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("creator3", "pass12345", "employee")
            .await;
        let product_id = app.create_product(&token, "Castle Gate", "BL-1031").await;

        let res = app
            .post_with_token(
                routes::ADMIN_INSTRUCTIONS,
                &json!({
                    "product": product_id,
                    "title": "Assembly manual",
                    "file": pdf_payload(),
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["success"], json!(true));
        assert_eq!(res.body["message"].as_str().unwrap(), "Instruction created");

        let public_id = res.body["instruction"]["file"]["public_id"]
            .as_str()
            .unwrap()
            .to_string();
        let url = res.body["instruction"]["file"]["url"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(url, format!("https://media.invalid/{public_id}.pdf"));

        // Exactly one upload into the configured folder.
        let calls = app.media.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            MediaCall::Upload { folder, .. } if folder == "test/instructions"
        ));

        // GET returns the same descriptor with the product projected.
        let id = res.instruction_id();
        let fetched = app.get_without_token(&routes::instruction(&id)).await;
        assert_eq!(fetched.status, 200, "{}", fetched.text);
        assert_eq!(
            fetched.body["instruction"]["file"]["url"].as_str().unwrap(),
            url
        );
        assert_eq!(
            fetched.body["instruction"]["product"]["product_name"]
                .as_str()
                .unwrap(),
            "Castle Gate"
        );
        assert_eq!(
            fetched.body["instruction"]["product"]["item_code"]
                .as_str()
                .unwrap(),
            "BL-1031"
        );
        assert_eq!(fetched.body["instruction"]["is_active"], json!(true));
    }

    #[tokio::test]
    async fn title_over_200_chars_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("creator4", "pass12345", "admin")
            .await;
        let product_id = app.create_product(&token, "Space Shuttle", "BL-9001").await;

        let res = app
            .post_with_token(
                routes::ADMIN_INSTRUCTIONS,
                &json!({
                    "product": product_id,
                    "title": "x".repeat(201),
                    "file": pdf_payload(),
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(
            res.body["message"].as_str().unwrap(),
            "Title cannot exceed 200 characters"
        );
        assert_eq!(app.media.upload_count(), 0);
    }

    #[tokio::test]
    async fn upload_failure_propagates_and_persists_nothing() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("creator5", "pass12345", "admin")
            .await;
        let product_id = app.create_product(&token, "Harbor Crane", "BL-4410").await;

        app.media.set_fail_uploads(true);
        let res = app
            .post_with_token(
                routes::ADMIN_INSTRUCTIONS,
                &json!({
                    "product": product_id,
                    "title": "Manual",
                    "file": pdf_payload(),
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 502, "{}", res.text);
        assert!(
            res.body["message"]
                .as_str()
                .unwrap()
                .contains("media service unavailable")
        );
        let stored = instruction::Entity::find().all(&app.db).await.unwrap();
        assert!(stored.is_empty());
    }
}

mod auth_gate {
    use super::*;

    #[tokio::test]
    async fn admin_routes_reject_missing_token() {
        let app = TestApp::spawn().await;

        let create = app
            .post_without_token(routes::ADMIN_INSTRUCTIONS, &json!({}))
            .await;
        assert_eq!(create.status, 401);

        let id = "0193a000-0000-7000-8000-000000000000";
        let update = app
            .put_without_token(&routes::admin_instruction(id), &json!({}))
            .await;
        assert_eq!(update.status, 401);

        let replace = app
            .put_without_token(&routes::admin_instruction_file(id), &json!({}))
            .await;
        assert_eq!(replace.status, 401);

        let delete = app.delete_without_token(&routes::admin_instruction(id)).await;
        assert_eq!(delete.status, 401);
    }

    #[tokio::test]
    async fn customers_are_forbidden() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("shopper1", "pass12345")
            .await;

        let res = app
            .post_with_token(
                routes::ADMIN_INSTRUCTIONS,
                &json!({ "product": 1, "title": "t", "file": pdf_payload() }),
                &token,
            )
            .await;

        assert_eq!(res.status, 403, "{}", res.text);
        assert_eq!(res.body["success"], json!(false));
    }

    #[tokio::test]
    async fn public_reads_need_no_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::INSTRUCTIONS).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], json!(true));
        assert_eq!(res.body["instructions"].as_array().unwrap().len(), 0);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn filters_by_product_and_sorts_newest_first() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("lister1", "pass12345", "admin")
            .await;
        let truck = app.create_product(&token, "Tow Truck", "BL-2050").await;
        let house = app.create_product(&token, "Town House", "BL-3085").await;

        let first = app.create_instruction(&token, truck, "Truck manual v1").await;
        let _other = app.create_instruction(&token, house, "House manual").await;
        let second = app.create_instruction(&token, truck, "Truck manual v2").await;

        let res = app
            .get_without_token(&routes::instructions_by_product(truck))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let instructions = res.body["instructions"].as_array().unwrap();
        assert_eq!(instructions.len(), 2);
        // Newest first.
        assert_eq!(instructions[0]["id"].as_str().unwrap(), second);
        assert_eq!(instructions[1]["id"].as_str().unwrap(), first);
        for item in instructions {
            assert_eq!(item["product"]["id"].as_i64().unwrap(), truck as i64);
            assert_eq!(item["product"]["product_name"].as_str().unwrap(), "Tow Truck");
        }

        let all = app.get_without_token(routes::INSTRUCTIONS).await;
        assert_eq!(all.body["instructions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn get_unknown_id_yields_404() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::instruction("0193a000-0000-7000-8000-000000000000"))
            .await;
        assert_eq!(res.status, 404, "{}", res.text);
        assert_eq!(
            res.body["message"].as_str().unwrap(),
            "Instruction not found"
        );
    }
}

mod update_metadata {
    use super::*;

    #[tokio::test]
    async fn title_change_is_persisted() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("editor1", "pass12345", "employee")
            .await;
        let product_id = app.create_product(&token, "Race Car", "BL-6610").await;
        let id = app.create_instruction(&token, product_id, "Old title").await;

        let res = app
            .put_with_token(
                &routes::admin_instruction(&id),
                &json!({ "title": "New title" }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"].as_str().unwrap(), "Instruction updated");
        assert_eq!(
            res.body["instruction"]["title"].as_str().unwrap(),
            "New title"
        );

        let fetched = app.get_without_token(&routes::instruction(&id)).await;
        assert_eq!(
            fetched.body["instruction"]["title"].as_str().unwrap(),
            "New title"
        );
        // Metadata updates never touch the media service.
        assert_eq!(app.media.upload_count(), 1);
        assert_eq!(app.media.delete_count(), 0);
    }

    #[tokio::test]
    async fn unknown_product_yields_404_and_leaves_record_unchanged() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("editor2", "pass12345", "admin")
            .await;
        let product_id = app.create_product(&token, "Police Boat", "BL-7720").await;
        let id = app.create_instruction(&token, product_id, "Boat manual").await;

        let res = app
            .put_with_token(
                &routes::admin_instruction(&id),
                &json!({ "product": 999_999 }),
                &token,
            )
            .await;

        assert_eq!(res.status, 404, "{}", res.text);
        assert_eq!(res.body["message"].as_str().unwrap(), "Product not found");

        let fetched = app.get_without_token(&routes::instruction(&id)).await;
        assert_eq!(
            fetched.body["instruction"]["product"]["id"].as_i64().unwrap(),
            product_id as i64
        );
    }

    #[tokio::test]
    async fn unknown_instruction_yields_404() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("editor3", "pass12345", "admin")
            .await;

        let res = app
            .put_with_token(
                &routes::admin_instruction("0193a000-0000-7000-8000-000000000000"),
                &json!({ "title": "anything" }),
                &token,
            )
            .await;

        assert_eq!(res.status, 404, "{}", res.text);
        assert_eq!(
            res.body["message"].as_str().unwrap(),
            "Instruction not found"
        );
    }
}

mod replace_file {
    use super::*;

    #[tokio::test]
    async fn deletes_old_asset_then_uploads_new_one() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("replacer1", "pass12345", "admin")
            .await;
        let product_id = app.create_product(&token, "Cargo Plane", "BL-8830").await;
        let id = app.create_instruction(&token, product_id, "Plane manual").await;

        let created = app.get_without_token(&routes::instruction(&id)).await;
        let old_public_id = created.body["instruction"]["file"]["public_id"]
            .as_str()
            .unwrap()
            .to_string();

        let res = app
            .put_with_token(
                &routes::admin_instruction_file(&id),
                &json!({ "file": pdf_payload() }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"].as_str().unwrap(), "File replaced");

        // Exactly one delete (old id) then exactly one upload, in that order.
        let calls = app.media.calls();
        assert_eq!(calls.len(), 3); // create upload, delete, replace upload
        assert_eq!(
            calls[1],
            MediaCall::Delete {
                public_id: old_public_id.clone()
            }
        );
        assert!(matches!(calls[2], MediaCall::Upload { .. }));

        let new_public_id = res.body["instruction"]["file"]["public_id"]
            .as_str()
            .unwrap();
        assert_ne!(new_public_id, old_public_id);

        let fetched = app.get_without_token(&routes::instruction(&id)).await;
        assert_eq!(
            fetched.body["instruction"]["file"]["public_id"]
                .as_str()
                .unwrap(),
            new_public_id
        );
    }

    #[tokio::test]
    async fn missing_file_yields_400() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("replacer2", "pass12345", "admin")
            .await;
        let product_id = app.create_product(&token, "Windmill", "BL-5560").await;
        let id = app.create_instruction(&token, product_id, "Windmill manual").await;

        let res = app
            .put_with_token(&routes::admin_instruction_file(&id), &json!({}), &token)
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["message"].as_str().unwrap(), "File is required");
        assert_eq!(app.media.delete_count(), 0);
    }

    #[tokio::test]
    async fn unknown_instruction_yields_404_without_media_calls() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("replacer3", "pass12345", "admin")
            .await;

        let res = app
            .put_with_token(
                &routes::admin_instruction_file("0193a000-0000-7000-8000-000000000000"),
                &json!({ "file": pdf_payload() }),
                &token,
            )
            .await;

        assert_eq!(res.status, 404, "{}", res.text);
        assert_eq!(app.media.upload_count(), 0);
        assert_eq!(app.media.delete_count(), 0);
    }

    #[tokio::test]
    async fn failed_delete_aborts_before_the_upload() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("replacer4", "pass12345", "admin")
            .await;
        let product_id = app.create_product(&token, "Ferry", "BL-1180").await;
        let id = app.create_instruction(&token, product_id, "Ferry manual").await;

        let before = app.get_without_token(&routes::instruction(&id)).await;
        let old_url = before.body["instruction"]["file"]["url"]
            .as_str()
            .unwrap()
            .to_string();

        app.media.set_fail_deletes(true);
        let res = app
            .put_with_token(
                &routes::admin_instruction_file(&id),
                &json!({ "file": pdf_payload() }),
                &token,
            )
            .await;

        assert_eq!(res.status, 502, "{}", res.text);
        // Delete failed first, so no second upload happened.
        assert_eq!(app.media.upload_count(), 1);

        let fetched = app.get_without_token(&routes::instruction(&id)).await;
        assert_eq!(
            fetched.body["instruction"]["file"]["url"].as_str().unwrap(),
            old_url
        );
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn removes_remote_asset_then_record() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("remover1", "pass12345", "admin")
            .await;
        let product_id = app.create_product(&token, "Monorail", "BL-6990").await;
        let id = app.create_instruction(&token, product_id, "Monorail manual").await;

        let created = app.get_without_token(&routes::instruction(&id)).await;
        let public_id = created.body["instruction"]["file"]["public_id"]
            .as_str()
            .unwrap()
            .to_string();

        let res = app
            .delete_with_token(&routes::admin_instruction(&id), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], json!(true));
        assert_eq!(res.body["message"].as_str().unwrap(), "Instruction deleted");

        let calls = app.media.calls();
        assert_eq!(app.media.delete_count(), 1);
        assert!(calls.contains(&MediaCall::Delete { public_id }));

        let fetched = app.get_without_token(&routes::instruction(&id)).await;
        assert_eq!(fetched.status, 404);
    }

    #[tokio::test]
    async fn unknown_instruction_yields_404() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("remover2", "pass12345", "admin")
            .await;

        let res = app
            .delete_with_token(
                &routes::admin_instruction("0193a000-0000-7000-8000-000000000000"),
                &token,
            )
            .await;

        assert_eq!(res.status, 404, "{}", res.text);
        assert_eq!(app.media.delete_count(), 0);
    }
}
