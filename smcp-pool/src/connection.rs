use std::sync::Arc;

use crate::{Driver, Result, ResultSet, Row, Summary, Value};

/// Cheaply cloneable handle over a shared driver.
#[derive(Clone)]
pub struct Connection {
    driver: Arc<dyn Driver>,
}

impl Connection {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self { driver }
    }

    pub fn from_driver<D: Driver + 'static>(driver: D) -> Self {
        Self::new(Arc::new(driver))
    }

    pub async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<Summary> {
        self.driver.execute(sql, params).await
    }

    pub async fn query(&self, sql: &str, params: Vec<Value>) -> Result<ResultSet> {
        self.driver.query(sql, params).await
    }

    pub async fn query_map<T, F>(&self, sql: &str, params: Vec<Value>, map: F) -> Result<Vec<T>>
    where
        F: Fn(&Row) -> Result<T>,
    {
        let set = self.driver.query(sql, params).await?;
        let mut res_list = Vec::<T>::with_capacity(set.rows.len());

        for row in &set.rows {
            res_list.push(map(row)?);
        }

        Ok(res_list)
    }
}
