mod error;

mod value;
pub(crate) use value::Value;

use mysql_async::{prelude::Queryable, Conn, Pool};
use mortar_core::{
    async_trait,
    driver::{Capability, Driver, NativeError, Response},
    Record, Result,
};
use url::Url;

#[derive(Debug)]
pub struct MySQL {
    pool: Pool,
}

impl MySQL {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(anyhow::Error::from)?;

        if url.scheme() != "mysql" {
            return Err(anyhow::anyhow!(
                "connection url does not have a `mysql` scheme; url={}",
                url
            )
            .into());
        }

        url.host_str()
            .ok_or_else(|| anyhow::anyhow!("missing host in connection URL; url={}", url))?;

        if url.path().trim_start_matches('/').is_empty() {
            return Err(anyhow::anyhow!(
                "no database specified - missing path in connection URL; url={}",
                url
            )
            .into());
        }

        let opts = mysql_async::Opts::from_url(url.as_ref()).map_err(anyhow::Error::from)?;
        // Updates report matched rows, not only changed ones
        let opts = mysql_async::OptsBuilder::from_opts(opts).client_found_rows(true);

        let pool = Pool::new(opts);
        Ok(Self { pool })
    }
}

impl From<Pool> for MySQL {
    fn from(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Driver for MySQL {
    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }

    async fn connect(&self) -> Result<Box<dyn mortar_core::driver::Connection>> {
        let conn = self
            .pool
            .get_conn()
            .await
            .map_err(mortar_core::Error::connection_from)?;
        Ok(Box::new(Connection::new(conn)))
    }
}

#[derive(Debug)]
pub struct Connection {
    conn: Conn,
}

impl Connection {
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }
}

impl From<Conn> for Connection {
    fn from(conn: Conn) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl mortar_core::driver::Connection for Connection {
    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }

    async fn exec(
        &mut self,
        sql: &str,
        params: &[mortar_core::Value],
    ) -> std::result::Result<Response, NativeError> {
        let args = params
            .iter()
            .map(|param| Value::from(param).into_inner())
            .collect::<Vec<_>>();

        let statement = self.conn.prep(sql).await.map_err(error::native)?;

        let mut result = self
            .conn
            .exec_iter(&statement, mysql_async::Params::Positional(args))
            .await
            .map_err(error::native)?;

        let has_columns = result
            .columns()
            .is_some_and(|columns| !columns.is_empty());

        if !has_columns {
            let count = result.affected_rows();
            let last_insert_id = result.last_insert_id();
            result.drop_result().await.map_err(error::native)?;

            tracing::trace!(count, ?last_insert_id, "statement executed");
            return Ok(Response::inserted(count, last_insert_id));
        }

        let rows: Vec<mysql_async::Row> = result.collect().await.map_err(error::native)?;

        let records = rows
            .into_iter()
            .map(|mut row| {
                let columns = row.columns();
                let mut record = Record::with_capacity(columns.len());

                for (i, column) in columns.iter().enumerate() {
                    let value = Value::from_sql(i, &mut row, column);
                    record.insert(column.name_str().into_owned(), value);
                }

                record
            })
            .collect();

        Ok(Response::values(records))
    }
}
