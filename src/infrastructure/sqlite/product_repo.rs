use crate::domain::entities::product::{ImportRow, NewProduct, Product, ProductPatch};
use crate::domain::error::DomainError;
use crate::domain::ports::product_repository::ProductRepository;
use crate::domain::values::page::Page;
use crate::domain::values::product_id::ProductId;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::sync::Mutex;

const SELECT_COLS: &str = "id, name, description, price, categories, rating, brand";

/// Ids bound per `IN (...)` lookup; stays under every SQLite build's
/// host-parameter limit.
const LOOKUP_CHUNK: usize = 999;

pub struct SqliteProductRepo {
    conn: Mutex<Connection>,
}

impl SqliteProductRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn row_to_product(row: &rusqlite::Row) -> Result<Product, rusqlite::Error> {
        Ok(Product {
            id: ProductId::new(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            categories: row.get(4)?,
            rating: row.get(5)?,
            brand: row.get(6)?,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    fn fetch_one(conn: &Connection, id: ProductId) -> Result<Option<Product>, DomainError> {
        let sql = format!("SELECT {SELECT_COLS} FROM products WHERE id = ?1");
        conn.query_row(&sql, params![id.value()], Self::row_to_product)
            .optional()
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

impl ProductRepository for SqliteProductRepo {
    fn list(&self, page: Page) -> Result<Vec<Product>, DomainError> {
        let offset = i64::try_from(page.skip()).map_err(|_| {
            DomainError::InvalidInput(format!("skip is too large: {}", page.skip()))
        })?;
        let conn = self.lock()?;
        let sql = format!("SELECT {SELECT_COLS} FROM products ORDER BY id LIMIT ?1 OFFSET ?2");
        let mut stmt = conn.prepare(&sql)?;
        let products = stmt
            .query_map(params![page.limit() as i64, offset], Self::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    fn list_all(&self) -> Result<Vec<Product>, DomainError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {SELECT_COLS} FROM products ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let products = stmt
            .query_map([], Self::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let conn = self.lock()?;
        Self::fetch_one(&conn, id)
    }

    fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, DomainError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let conn = self.lock()?;
        let mut products = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(LOOKUP_CHUNK) {
            let placeholders = (1..=chunk.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!("SELECT {SELECT_COLS} FROM products WHERE id IN ({placeholders})");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter().map(|id| id.value())), Self::row_to_product)?
                .collect::<Result<Vec<_>, _>>()?;
            products.extend(rows);
        }
        Ok(products)
    }

    fn create(&self, product: &NewProduct) -> Result<Product, DomainError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO products (name, description, price, categories, rating, brand)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                product.name,
                product.description,
                product.price,
                product.categories,
                product.rating,
                product.brand,
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to add product: {e}")))?;
        let id = ProductId::new(conn.last_insert_rowid());
        Self::fetch_one(&conn, id)?.ok_or_else(|| DomainError::product_not_found(id.value()))
    }

    fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Option<Product>, DomainError> {
        let conn = self.lock()?;
        let Some(mut product) = Self::fetch_one(&conn, id)? else {
            return Ok(None);
        };
        patch.apply(&mut product);
        conn.execute(
            "UPDATE products
             SET name = ?2, description = ?3, price = ?4, categories = ?5, rating = ?6, brand = ?7
             WHERE id = ?1",
            params![
                id.value(),
                product.name,
                product.description,
                product.price,
                product.categories,
                product.rating,
                product.brand,
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to update product {id}: {e}")))?;
        Ok(Some(product))
    }

    fn delete(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let conn = self.lock()?;
        let Some(product) = Self::fetch_one(&conn, id)? else {
            return Ok(None);
        };
        conn.execute("DELETE FROM products WHERE id = ?1", params![id.value()])
            .map_err(|e| DomainError::Database(format!("Failed to delete product {id}: {e}")))?;
        Ok(Some(product))
    }

    fn count(&self) -> Result<usize, DomainError> {
        let conn = self.lock()?;
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))?;
        Ok(total as usize)
    }

    fn import(&self, rows: &[ImportRow]) -> Result<usize, DomainError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut with_id = tx.prepare(
                "INSERT OR REPLACE INTO products (id, name, description, price, categories, rating, brand)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            let mut without_id = tx.prepare(
                "INSERT INTO products (name, description, price, categories, rating, brand)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                let p = &row.product;
                match row.id {
                    Some(id) => with_id.execute(params![
                        id.value(),
                        p.name,
                        p.description,
                        p.price,
                        p.categories,
                        p.rating,
                        p.brand,
                    ])?,
                    None => without_id.execute(params![
                        p.name,
                        p.description,
                        p.price,
                        p.categories,
                        p.rating,
                        p.brand,
                    ])?,
                };
            }
        }
        tx.commit()
            .map_err(|e| DomainError::Database(format!("Import failed: {e}")))?;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::migrations::run_migrations;

    fn repo() -> SqliteProductRepo {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        SqliteProductRepo::new(conn)
    }

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.into(),
            description: format!("{name} description"),
            price: 10.0,
            categories: "misc".into(),
            rating: None,
            brand: None,
        }
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let repo = repo();
        let a = repo.create(&new_product("a")).unwrap();
        let b = repo.create(&new_product("b")).unwrap();
        assert!(b.id > a.id);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let repo = repo();
        let a = repo.create(&new_product("a")).unwrap();
        repo.delete(a.id).unwrap();
        let b = repo.create(&new_product("b")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_list_pages_in_id_order() {
        let repo = repo();
        for name in ["a", "b", "c", "d"] {
            repo.create(&new_product(name)).unwrap();
        }
        let page = repo.list(Page::new(1, 2).unwrap()).unwrap();
        let names: Vec<_> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_get_many_skips_missing() {
        let repo = repo();
        let a = repo.create(&new_product("a")).unwrap();
        let b = repo.create(&new_product("b")).unwrap();
        let found = repo
            .get_many(&[b.id, ProductId::new(999), a.id])
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(repo.get_many(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_get_many_beyond_one_lookup_chunk() {
        let repo = repo();
        let rows: Vec<ImportRow> = (0..LOOKUP_CHUNK * 2 + 5)
            .map(|i| ImportRow {
                id: None,
                product: new_product(&format!("item {i}")),
            })
            .collect();
        repo.import(&rows).unwrap();

        let mut ids: Vec<ProductId> = repo.list_all().unwrap().into_iter().map(|p| p.id).collect();
        ids.push(ProductId::new(-1));
        let found = repo.get_many(&ids).unwrap();
        assert_eq!(found.len(), rows.len());
    }

    #[test]
    fn test_list_rejects_unrepresentable_skip() {
        let repo = repo();
        repo.create(&new_product("a")).unwrap();
        let err = repo.list(Page::new(usize::MAX, 10).unwrap()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn test_update_and_delete_missing() {
        let repo = repo();
        let missing = ProductId::new(42);
        assert!(repo.update(missing, &ProductPatch::default()).unwrap().is_none());
        assert!(repo.delete(missing).unwrap().is_none());
    }

    #[test]
    fn test_update_persists_patch() {
        let repo = repo();
        let a = repo.create(&new_product("a")).unwrap();
        let patch = ProductPatch {
            rating: Some(Some(3.5)),
            ..Default::default()
        };
        repo.update(a.id, &patch).unwrap();
        let stored = repo.get(a.id).unwrap().unwrap();
        assert_eq!(stored.rating, Some(3.5));
        assert_eq!(stored.name, "a");
    }

    #[test]
    fn test_import_upserts_explicit_ids() {
        let repo = repo();
        let rows = vec![
            ImportRow {
                id: Some(ProductId::new(5)),
                product: new_product("five"),
            },
            ImportRow {
                id: None,
                product: new_product("next"),
            },
        ];
        assert_eq!(repo.import(&rows).unwrap(), 2);
        assert_eq!(repo.get(ProductId::new(5)).unwrap().unwrap().name, "five");

        let again = vec![ImportRow {
            id: Some(ProductId::new(5)),
            product: new_product("five v2"),
        }];
        repo.import(&again).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
        assert_eq!(repo.get(ProductId::new(5)).unwrap().unwrap().name, "five v2");
    }
}
